// Per-trainee session state and the five operations a front end drives.
// Nothing here outlives the process: history is exported on demand, never stored.

pub mod export;
pub mod store;

use bytes::Bytes;
use rand::Rng;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{Credential, TextGenerator};
use crate::models::{EvaluationRecord, HistoryEntry, MentorAnswer, Persona, ScenarioRecord};
use crate::simulation::evaluator::{self, TraineeResponse};
use crate::simulation::mentor;
use crate::simulation::scenario::{self, ScenarioRequest};

pub use store::SessionStore;

/// One trainee's simulator state.
///
/// Invariant: `evaluation` and `mentor_answer` always interpret the current
/// `scenario`; replacing or clearing the scenario clears both. `history` only grows.
#[derive(Debug, Default)]
pub struct TrainingSession {
    scenario: Option<ScenarioRecord>,
    evaluation: Option<EvaluationRecord>,
    mentor_answer: Option<MentorAnswer>,
    history: Vec<HistoryEntry>,
}

impl TrainingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scenario(&self) -> Option<&ScenarioRecord> {
        self.scenario.as_ref()
    }

    pub fn evaluation(&self) -> Option<&EvaluationRecord> {
        self.evaluation.as_ref()
    }

    pub fn mentor_answer(&self) -> Option<&MentorAnswer> {
        self.mentor_answer.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    fn active_scenario(&self) -> Result<&ScenarioRecord, AppError> {
        self.scenario.as_ref().ok_or_else(|| {
            AppError::Conflict("No active scenario. Generate a scenario first.".to_string())
        })
    }

    /// Starts a new round. Randomness is drawn up front; the two gateway calls follow.
    pub async fn generate_scenario<R>(
        &mut self,
        llm: &dyn TextGenerator,
        credential: &Credential,
        request: &ScenarioRequest,
        rng: &mut R,
    ) -> Result<&ScenarioRecord, AppError>
    where
        R: Rng + Send + ?Sized,
    {
        request.validate()?;

        let plan = scenario::plan_scenario(request, rng);
        let record = scenario::generate_scenario(llm, credential, request, &plan).await;

        self.evaluation = None;
        self.mentor_answer = None;
        Ok(&*self.scenario.insert(record))
    }

    /// Scores the trainee's response to the active scenario and logs the round.
    /// Leaves any mentor answer in place.
    pub async fn evaluate(
        &mut self,
        llm: &dyn TextGenerator,
        credential: &Credential,
        response: &TraineeResponse,
        persona: Persona,
    ) -> Result<&EvaluationRecord, AppError> {
        response.validate()?;
        let scenario = self.active_scenario()?;

        let record = evaluator::evaluate(llm, credential, scenario, response, persona).await;
        let entry = HistoryEntry::new(
            self.history.len() + 1,
            scenario,
            &response.action,
            &response.notice,
            &record,
        );

        info!(round = entry.round, score = entry.score, risk = entry.risk, "Round logged");
        self.history.push(entry);
        Ok(&*self.evaluation.insert(record))
    }

    /// Fetches the expert answer for the active scenario. Not logged; leaves any
    /// evaluation in place.
    pub async fn get_mentor_answer(
        &mut self,
        llm: &dyn TextGenerator,
        credential: &Credential,
    ) -> Result<&MentorAnswer, AppError> {
        let scenario = self.active_scenario()?;
        let answer = mentor::mentor_answer(llm, credential, scenario).await;
        Ok(&*self.mentor_answer.insert(answer))
    }

    /// Drops the active round. History is kept.
    pub fn reset(&mut self) {
        self.scenario = None;
        self.evaluation = None;
        self.mentor_answer = None;
    }

    pub fn export_history(&self) -> Result<Bytes, AppError> {
        export::history_csv(&self.history)
    }
}
