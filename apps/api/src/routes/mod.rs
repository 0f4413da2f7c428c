pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::simulation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(handlers::handle_catalog))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        // Training round
        .route(
            "/api/v1/sessions/:id/scenario",
            post(handlers::handle_generate_scenario),
        )
        .route(
            "/api/v1/sessions/:id/evaluation",
            post(handlers::handle_evaluate),
        )
        .route("/api/v1/sessions/:id/mentor", post(handlers::handle_mentor))
        .route("/api/v1/sessions/:id/reset", post(handlers::handle_reset))
        // Session log
        .route(
            "/api/v1/sessions/:id/history",
            get(handlers::handle_history),
        )
        .route("/api/v1/sessions/:id/export", get(handlers::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, ProviderKeys};
    use crate::session::SessionStore;
    use crate::test_support::{ScriptedGenerator, CAUSE_REPORT, PUBLIC_BRIEFING, SCORED_FEEDBACK};

    fn app_with(llm: ScriptedGenerator, api_keys: ProviderKeys) -> Router {
        let config = Config {
            api_keys,
            ..Config::default()
        };
        build_router(AppState {
            llm: Arc::new(llm),
            sessions: SessionStore::new(),
            config,
        })
    }

    fn keyed() -> ProviderKeys {
        ProviderKeys {
            mistral: Some("server-key".to_string()),
            ..ProviderKeys::default()
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        json_of(&body)["session_id"].as_str().unwrap().to_string()
    }

    fn scenario_body() -> Value {
        json!({ "genre": "MOBA (AOS)", "platform": "mobile", "difficulty": "normal" })
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(ScriptedGenerator::new(Vec::<String>::new()), keyed());
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_catalog_lists_every_choice() {
        let app = app_with(ScriptedGenerator::new(Vec::<String>::new()), keyed());
        let (status, body) = send(&app, Method::GET, "/api/v1/catalog", None).await;
        assert_eq!(status, StatusCode::OK);

        let catalog = json_of(&body);
        assert_eq!(catalog["genres"].as_array().unwrap().len(), 7);
        assert_eq!(catalog["difficulties"].as_array().unwrap().len(), 3);
        assert_eq!(catalog["providers"].as_array().unwrap().len(), 3);
        assert_eq!(catalog["default_provider"], "mistral");
    }

    #[tokio::test]
    async fn test_full_round_then_export() {
        let llm = ScriptedGenerator::new([PUBLIC_BRIEFING, CAUSE_REPORT, SCORED_FEEDBACK]);
        let app = app_with(llm, keyed());
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/scenario"),
            Some(scenario_body()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let scenario = json_of(&body);
        assert!(!scenario["public_text"].as_str().unwrap().contains("```"));
        assert_eq!(scenario["cause_text"], CAUSE_REPORT);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/evaluation"),
            Some(json!({ "action": "서버 롤백", "notice": "[공지] 점검 안내" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let evaluation = json_of(&body);
        assert_eq!(evaluation["score"], 72);
        assert_eq!(evaluation["risk"], 40);

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        let snapshot = json_of(&body);
        assert_eq!(snapshot["history_len"], 1);
        assert!(snapshot["advisory"].is_string());

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/sessions/{id}/export"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("\u{feff}Round,Genre,Score,Risk"));
        assert!(text.contains("서버 롤백"));
    }

    #[tokio::test]
    async fn test_missing_credential_is_rejected_before_any_call() {
        let app = app_with(ScriptedGenerator::new(Vec::<String>::new()), ProviderKeys::default());
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/scenario"),
            Some(scenario_body()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["error"]["code"], "MISSING_CREDENTIAL");

        let (_, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert!(json_of(&body)["scenario"].is_null());
    }

    #[tokio::test]
    async fn test_request_key_overrides_missing_server_key() {
        let llm = ScriptedGenerator::new([PUBLIC_BRIEFING, CAUSE_REPORT]);
        let app = app_with(llm, ProviderKeys::default());
        let id = create_session(&app).await;

        let mut body = scenario_body();
        body["provider"] = json!("openai");
        body["api_key"] = json!("sk-request");
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/scenario"),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app_with(ScriptedGenerator::new(Vec::<String>::new()), keyed());
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_of(&body)["error"]["code"], "NOT_FOUND");

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_evaluation_without_scenario_conflicts() {
        let app = app_with(ScriptedGenerator::new(Vec::<String>::new()), keyed());
        let id = create_session(&app).await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/evaluation"),
            Some(json!({ "action": "롤백", "notice": "공지" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/mentor"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_reset_and_delete() {
        let llm = ScriptedGenerator::new([PUBLIC_BRIEFING, CAUSE_REPORT, "멘토 답안"]);
        let app = app_with(llm, keyed());
        let id = create_session(&app).await;
        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/scenario"),
            Some(scenario_body()),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/mentor"),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body)["text"], "멘토 답안");

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/reset"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let snapshot = json_of(&body);
        assert!(snapshot["scenario"].is_null());
        assert!(snapshot["mentor_answer"].is_null());
        assert!(snapshot["advisory"].is_null());

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}/history"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
