//! Scenario Generator: builds the incident briefing and its hidden cause.
//!
//! Flow: pick triggers → render briefing prompt → gateway call (persona temperature)
//!       → gateway call for the true cause (fixed 0.3) → ScenarioRecord.
//!
//! Two calls, not one split response: a failure in either call lands verbatim
//! in its own field and the round is still created.

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{is_gateway_error, sanitize, Credential, TextGenerator};
use crate::models::{Difficulty, Genre, Persona, Platform, ScenarioRecord};
use crate::simulation::keywords::pick_triggers;
use crate::simulation::prompts::{
    render, severity_instruction, CAUSE_SYSTEM, CAUSE_TEMPERATURE, CAUSE_USER_TEMPLATE,
    SCENARIO_SYSTEM_TEMPLATE, SCENARIO_USER,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRequest {
    pub genre: Genre,
    pub platform: Platform,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub persona: Persona,
}

impl ScenarioRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.genre.label().trim().is_empty() {
            return Err(AppError::Validation("genre cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Everything random about a round, decided before any gateway call.
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    pub triggers: String,
    pub system_prompt: String,
    pub temperature: f32,
}

pub fn plan_scenario<R: Rng + ?Sized>(request: &ScenarioRequest, rng: &mut R) -> ScenarioPlan {
    let triggers = pick_triggers(&request.genre, request.difficulty, rng);

    let system_prompt = render(
        SCENARIO_SYSTEM_TEMPLATE,
        &[
            ("genre", request.genre.label()),
            ("platform", request.platform.label()),
            ("difficulty", request.difficulty.label()),
            ("level_instruction", severity_instruction(request.difficulty)),
            ("triggers", triggers.as_str()),
        ],
    );

    ScenarioPlan {
        triggers,
        system_prompt,
        temperature: request.persona.temperature(),
    }
}

/// Runs both gateway calls for a planned round.
pub async fn generate_scenario(
    llm: &dyn TextGenerator,
    credential: &Credential,
    request: &ScenarioRequest,
    plan: &ScenarioPlan,
) -> ScenarioRecord {
    info!(
        genre = request.genre.label(),
        difficulty = ?request.difficulty,
        provider = %credential.provider,
        triggers = %plan.triggers,
        "Generating scenario"
    );

    let public_text = sanitize(
        &llm.generate(credential, &plan.system_prompt, SCENARIO_USER, plan.temperature)
            .await,
    );

    let cause_prompt = render(CAUSE_USER_TEMPLATE, &[("public_text", public_text.as_str())]);
    let cause_text = sanitize(
        &llm.generate(credential, CAUSE_SYSTEM, &cause_prompt, CAUSE_TEMPERATURE)
            .await,
    );

    if is_gateway_error(&public_text) || is_gateway_error(&cause_text) {
        warn!("Scenario created with inline gateway error");
    }

    ScenarioRecord {
        public_text,
        cause_text,
        genre: request.genre.clone(),
        platform: request.platform,
        difficulty: request.difficulty,
        created_at: Utc::now(),
    }
}
