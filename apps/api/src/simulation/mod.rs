// Crisis simulation pipeline: trigger keywords, scenario generation,
// evaluation, mentor fallback and score extraction.
// All model calls go through llm_client::TextGenerator; nothing here talks HTTP to a provider.

pub mod evaluator;
pub mod handlers;
pub mod keywords;
pub mod mentor;
pub mod prompts;
pub mod scenario;
pub mod scoring;
