//! Axum route handlers for the training-session API.
//!
//! Every handler resolves the session and the credential before touching state,
//! so configuration errors never leave a half-updated session behind.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::ModelSelection;
use crate::errors::AppError;
use crate::llm_client::Provider;
use crate::models::{
    Difficulty, EvaluationView, Genre, HistoryEntry, MentorAnswer, Persona, Platform,
    ScenarioRecord,
};
use crate::session::export::{EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
use crate::session::TrainingSession;
use crate::simulation::evaluator::TraineeResponse;
use crate::simulation::prompts::ADVISORY_NOTICE;
use crate::simulation::scenario::ScenarioRequest;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateScenarioRequest {
    #[serde(flatten)]
    pub scenario: ScenarioRequest,
    #[serde(flatten)]
    pub model: ModelSelection,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(flatten)]
    pub response: TraineeResponse,
    #[serde(default)]
    pub persona: Persona,
    #[serde(flatten)]
    pub model: ModelSelection,
}

#[derive(Debug, Deserialize)]
pub struct MentorRequest {
    #[serde(flatten)]
    pub model: ModelSelection,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Everything a front end needs to redraw the simulator screen.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub scenario: Option<ScenarioRecord>,
    pub evaluation: Option<EvaluationView>,
    pub mentor_answer: Option<MentorAnswer>,
    /// Present whenever an evaluation or mentor answer is on screen.
    pub advisory: Option<&'static str>,
    pub history_len: usize,
}

impl SessionSnapshot {
    fn of(session_id: Uuid, session: &TrainingSession) -> Self {
        let evaluation = session.evaluation().map(|e| e.view());
        let mentor_answer = session.mentor_answer().cloned();
        let advisory = (evaluation.is_some() || mentor_answer.is_some()).then_some(ADVISORY_NOTICE);
        Self {
            session_id,
            scenario: session.scenario().cloned(),
            evaluation,
            mentor_answer,
            advisory,
            history_len: session.history().len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Choice<T> {
    pub value: T,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PersonaChoice {
    pub value: Persona,
    pub label: &'static str,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct ProviderChoice {
    pub value: Provider,
    pub label: &'static str,
    pub model: &'static str,
}

/// Options for the setup screen.
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub genres: Vec<Genre>,
    pub platforms: Vec<Choice<Platform>>,
    pub difficulties: Vec<Choice<Difficulty>>,
    pub personas: Vec<PersonaChoice>,
    pub providers: Vec<ProviderChoice>,
    pub default_provider: Provider,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/catalog
pub async fn handle_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(Catalog {
        genres: Genre::CATALOG.to_vec(),
        platforms: Platform::ALL
            .into_iter()
            .map(|p| Choice { value: p, label: p.label() })
            .collect(),
        difficulties: Difficulty::ALL
            .into_iter()
            .map(|d| Choice { value: d, label: d.label() })
            .collect(),
        personas: Persona::ALL
            .into_iter()
            .map(|p| PersonaChoice {
                value: p,
                label: p.label(),
                temperature: p.temperature(),
            })
            .collect(),
        providers: Provider::ALL
            .into_iter()
            .map(|p| ProviderChoice {
                value: p,
                label: p.label(),
                model: p.model(),
            })
            .collect(),
        default_provider: state.config.default_provider,
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    let live = state.sessions.len().await;
    info!(live, "Created session {session_id}");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let session = session.lock().await;
    Ok(Json(SessionSnapshot::of(session_id, &session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    info!("Ended session {session_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/scenario
///
/// Starts a new round. Replaces the active scenario and clears the evaluation
/// and mentor answer that belonged to the old one.
pub async fn handle_generate_scenario(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<GenerateScenarioRequest>,
) -> Result<Json<ScenarioRecord>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let credential = state.config.credential(&request.model)?;

    let mut session = session.lock().await;
    let mut rng = StdRng::from_entropy();
    let record = session
        .generate_scenario(state.llm.as_ref(), &credential, &request.scenario, &mut rng)
        .await?;

    Ok(Json(record.clone()))
}

/// POST /api/v1/sessions/:id/evaluation
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluationView>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let credential = state.config.credential(&request.model)?;

    let mut session = session.lock().await;
    let record = session
        .evaluate(state.llm.as_ref(), &credential, &request.response, request.persona)
        .await?;

    Ok(Json(record.view()))
}

/// POST /api/v1/sessions/:id/mentor
pub async fn handle_mentor(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<MentorRequest>,
) -> Result<Json<MentorAnswer>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let credential = state.config.credential(&request.model)?;

    let mut session = session.lock().await;
    let answer = session
        .get_mentor_answer(state.llm.as_ref(), &credential)
        .await?;

    Ok(Json(answer.clone()))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let mut session = session.lock().await;
    session.reset();
    info!("Reset session {session_id}");
    Ok(Json(SessionSnapshot::of(session_id, &session)))
}

/// GET /api/v1/sessions/:id/history
pub async fn handle_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let session = session.lock().await;
    Ok(Json(session.history().to_vec()))
}

/// GET /api/v1/sessions/:id/export
///
/// Downloads the session log as a spreadsheet.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.get(session_id).await?;
    let body = session.lock().await.export_history()?;

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}
