//! Evaluator: scores the trainee's response and projects both outcomes.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{is_gateway_error, sanitize, Credential, TextGenerator};
use crate::models::{EvaluationRecord, Persona, ScenarioRecord};
use crate::simulation::prompts::{render, EVALUATION_SYSTEM, EVALUATION_USER_TEMPLATE};

/// What the trainee submits: internal action plan and public notice.
#[derive(Debug, Clone, Deserialize)]
pub struct TraineeResponse {
    pub action: String,
    pub notice: String,
}

impl TraineeResponse {
    /// Both fields are required. Checked before any gateway call.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.action.trim().is_empty() {
            return Err(AppError::Validation("action cannot be empty".to_string()));
        }
        if self.notice.trim().is_empty() {
            return Err(AppError::Validation("notice cannot be empty".to_string()));
        }
        Ok(())
    }
}

pub async fn evaluate(
    llm: &dyn TextGenerator,
    credential: &Credential,
    scenario: &ScenarioRecord,
    response: &TraineeResponse,
    persona: Persona,
) -> EvaluationRecord {
    let user_prompt = render(
        EVALUATION_USER_TEMPLATE,
        &[
            ("public_text", scenario.public_text.as_str()),
            ("cause_text", scenario.cause_text.as_str()),
            ("action", response.action.as_str()),
            ("notice", response.notice.as_str()),
        ],
    );

    let raw_text = sanitize(
        &llm.generate(credential, EVALUATION_SYSTEM, &user_prompt, persona.temperature())
            .await,
    );

    let record = EvaluationRecord { raw_text };
    info!(
        score = record.score(),
        risk = record.risk(),
        inline_error = is_gateway_error(&record.raw_text),
        "Evaluation complete"
    );
    record
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Difficulty, Genre, Platform};
    use crate::test_support::{test_credential, ScriptedGenerator, SCORED_FEEDBACK};

    fn scenario() -> ScenarioRecord {
        ScenarioRecord {
            public_text: "서버 팅김 3시간째".to_string(),
            cause_text: "세션 캐시 TTL 0".to_string(),
            genre: Genre::Moba,
            platform: Platform::Pc,
            difficulty: Difficulty::Severe,
            created_at: Utc::now(),
        }
    }

    fn response() -> TraineeResponse {
        TraineeResponse {
            action: "세션 캐시 설정 롤백, 패배 기록 무효화".to_string(),
            notice: "[공지] 접속 장애에 대해 사과드립니다.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_evaluate_derives_scores() {
        let llm = ScriptedGenerator::new([format!("```\n{SCORED_FEEDBACK}\n```")]);

        let record = evaluate(&llm, &test_credential(), &scenario(), &response(), Persona::Conservative).await;

        assert_eq!(record.score(), 72);
        assert_eq!(record.risk(), 40);
        assert!(!record.raw_text.starts_with("```"));

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, EVALUATION_SYSTEM);
        assert!(calls[0].user.contains("[상황] 서버 팅김 3시간째"));
        assert!(calls[0].user.contains("[진실] 세션 캐시 TTL 0"));
        assert!(calls[0].user.contains("[조치] 세션 캐시 설정 롤백"));
        assert!(calls[0].user.contains("[공지] [공지] 접속 장애"));
        assert!((calls[0].temperature - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_evaluate_without_tags_uses_defaults() {
        let llm = ScriptedGenerator::new(["좋은 대응입니다."]);
        let record = evaluate(&llm, &test_credential(), &scenario(), &response(), Persona::Balanced).await;
        assert_eq!(record.score(), 0);
        assert_eq!(record.risk(), 50);
    }

    #[test]
    fn test_blank_fields_rejected() {
        let blank_action = TraineeResponse {
            action: "  \n".to_string(),
            ..response()
        };
        assert!(matches!(blank_action.validate(), Err(AppError::Validation(_))));

        let blank_notice = TraineeResponse {
            notice: String::new(),
            ..response()
        };
        assert!(matches!(blank_notice.validate(), Err(AppError::Validation(_))));

        assert!(response().validate().is_ok());
    }
}
