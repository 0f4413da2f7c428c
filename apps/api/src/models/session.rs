use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::scenario::{Genre, ScenarioRecord};
use crate::simulation::scoring::{
    classify_risk, classify_score, extract_eval_score, extract_risk_score, RiskTier, ScoreTier,
};

/// Raw evaluator output. Scores are derived from the text on demand.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub raw_text: String,
}

impl EvaluationRecord {
    pub fn score(&self) -> u32 {
        extract_eval_score(&self.raw_text)
    }

    pub fn risk(&self) -> u32 {
        extract_risk_score(&self.raw_text)
    }

    pub fn view(&self) -> EvaluationView {
        let score = self.score();
        let risk = self.risk();
        let (risk_tier, risk_label) = classify_risk(risk);
        EvaluationView {
            raw_text: self.raw_text.clone(),
            score,
            risk,
            risk_tier,
            risk_label,
            score_tier: classify_score(score),
        }
    }
}

/// Evaluation as shown to the trainee: the text plus its derived numbers.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationView {
    pub raw_text: String,
    pub score: u32,
    pub risk: u32,
    pub risk_tier: RiskTier,
    pub risk_label: &'static str,
    pub score_tier: ScoreTier,
}

/// Expert model answer for the active scenario. Never scored, never logged.
#[derive(Debug, Clone, Serialize)]
pub struct MentorAnswer {
    pub text: String,
}

/// One evaluated round in the session log. Append-only.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub round: usize,
    pub genre: Genre,
    pub score: u32,
    pub risk: u32,
    pub scenario_text: String,
    pub action_text: String,
    pub notice_text: String,
    pub feedback_text: String,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        round: usize,
        scenario: &ScenarioRecord,
        action: &str,
        notice: &str,
        evaluation: &EvaluationRecord,
    ) -> Self {
        Self {
            round,
            genre: scenario.genre.clone(),
            score: evaluation.score(),
            risk: evaluation.risk(),
            scenario_text: scenario.public_text.clone(),
            action_text: action.to_string(),
            notice_text: notice.to_string(),
            feedback_text: evaluation.raw_text.clone(),
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_derive_from_text() {
        let record = EvaluationRecord {
            raw_text: "[[점수: 85]]\n[[리스크: 20]]\n## 🔮 미래 시뮬레이션".to_string(),
        };
        let view = record.view();
        assert_eq!(view.score, 85);
        assert_eq!(view.risk, 20);
        assert_eq!(view.risk_tier, RiskTier::Low);
        assert_eq!(view.score_tier, ScoreTier::Excellent);
    }

    #[test]
    fn test_unparsable_text_uses_defaults() {
        let record = EvaluationRecord {
            raw_text: "⚠ AI 통신 오류 발생: timeout".to_string(),
        };
        assert_eq!(record.score(), 0);
        assert_eq!(record.risk(), 50);
        assert_eq!(record.view().risk_tier, RiskTier::Mid);
    }
}
