//! Mentor Fallback: the expert answer for a trainee who gives up.
//! Ignores trainee input, always runs at the default temperature, never scored.

use tracing::info;

use crate::llm_client::{sanitize, Credential, TextGenerator, DEFAULT_TEMPERATURE};
use crate::models::{MentorAnswer, ScenarioRecord};
use crate::simulation::prompts::{render, MENTOR_SYSTEM, MENTOR_USER_TEMPLATE};

pub async fn mentor_answer(
    llm: &dyn TextGenerator,
    credential: &Credential,
    scenario: &ScenarioRecord,
) -> MentorAnswer {
    let user_prompt = render(
        MENTOR_USER_TEMPLATE,
        &[
            ("public_text", scenario.public_text.as_str()),
            ("cause_text", scenario.cause_text.as_str()),
        ],
    );

    info!(provider = %credential.provider, "Requesting mentor answer");

    let text = sanitize(
        &llm.generate(credential, MENTOR_SYSTEM, &user_prompt, DEFAULT_TEMPERATURE)
            .await,
    );

    MentorAnswer { text }
}
