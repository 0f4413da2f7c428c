//! Score extraction: reads the evaluator's bracketed tags out of free-form text.
//!
//! A missing tag is never an error: the evaluation score defaults to 0 ("no
//! score"), the risk score to 50 ("unknown risk").

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const DEFAULT_EVAL_SCORE: u32 = 0;
pub const DEFAULT_RISK_SCORE: u32 = 50;

const HIGH_THRESHOLD: u32 = 80;
const MID_THRESHOLD: u32 = 50;

// ASCII digits only; `\d` would also accept other Unicode digit classes.
static EVAL_SCORE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[점수:\s*([0-9]{1,3})\]\]").expect("evaluation score tag pattern is valid")
});
static RISK_SCORE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[리스크:\s*([0-9]{1,3})\]\]").expect("risk score tag pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Mid,
    High,
}

/// Tone of the result panel, keyed off the evaluation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Poor,
    Fair,
    Excellent,
}

fn extract_tag(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `[[점수: N]]` → N, or 0. Not clamped to 0–100.
pub fn extract_eval_score(text: &str) -> u32 {
    extract_tag(&EVAL_SCORE_TAG, text).unwrap_or(DEFAULT_EVAL_SCORE)
}

/// `[[리스크: N]]` → N, or 50. Not clamped to 0–100.
pub fn extract_risk_score(text: &str) -> u32 {
    extract_tag(&RISK_SCORE_TAG, text).unwrap_or(DEFAULT_RISK_SCORE)
}

/// Three-tier risk classification with its display label.
/// Anything at or above 80 (including out-of-range values) is high.
pub fn classify_risk(score: u32) -> (RiskTier, &'static str) {
    if score >= HIGH_THRESHOLD {
        (RiskTier::High, "🚨 위험 (DANGER)")
    } else if score >= MID_THRESHOLD {
        (RiskTier::Mid, "⚠️ 주의 (CAUTION)")
    } else {
        (RiskTier::Low, "✅ 안전 (SAFE)")
    }
}

pub fn classify_score(score: u32) -> ScoreTier {
    if score >= HIGH_THRESHOLD {
        ScoreTier::Excellent
    } else if score >= MID_THRESHOLD {
        ScoreTier::Fair
    } else {
        ScoreTier::Poor
    }
}
