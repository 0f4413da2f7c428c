// Cross-cutting gateway text fragments.
// Each simulation step defines its own prompts in simulation/prompts.rs.

/// Leading glyph that marks gateway output as a failure rather than model text.
pub const GATEWAY_ERROR_MARKER: &str = "⚠";

/// Full prefix of an inline gateway failure. The error message follows it.
pub const GATEWAY_ERROR_PREFIX: &str = "⚠ AI 통신 오류 발생: ";

/// Header separating the folded-in system instruction from the task for providers
/// that take a single user turn.
pub const SINGLE_TURN_TASK_HEADER: &str = "[상황/요청]";

/// Folds a system + user instruction pair into one user turn.
pub fn fold_instructions(system: &str, user: &str) -> String {
    format!("{system}\n\n{SINGLE_TURN_TASK_HEADER}\n{user}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_starts_with_marker() {
        assert!(GATEWAY_ERROR_PREFIX.starts_with(GATEWAY_ERROR_MARKER));
    }

    #[test]
    fn test_fold_instructions_layout() {
        assert_eq!(
            fold_instructions("역할", "요청"),
            "역할\n\n[상황/요청]\n요청"
        );
    }
}
