// Session-scoped records. Nothing here is persisted: every value lives in a
// `TrainingSession` and disappears with it.

pub mod scenario;
pub mod session;

pub use scenario::{Difficulty, Genre, Persona, Platform, ScenarioRecord};
pub use session::{EvaluationRecord, EvaluationView, HistoryEntry, MentorAnswer};
