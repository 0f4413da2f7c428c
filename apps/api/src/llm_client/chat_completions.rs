//! Chat-completions providers (OpenAI, Mistral).
//!
//! Both speak the same `/chat/completions` dialect: bearer auth, a system and a
//! user message, `temperature`, `max_tokens`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{api_error_message, LlmError, ModelProvider, Prompt, Provider, MAX_TOKENS};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

pub struct ChatCompletionsProvider {
    provider: Provider,
    base_url: String,
}

impl ChatCompletionsProvider {
    pub fn new(provider: Provider, base_url: &str) -> Self {
        Self {
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request<'a>(&self, prompt: &Prompt<'a>) -> ChatRequest<'a> {
        ChatRequest {
            model: self.provider.model(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl ModelProvider for ChatCompletionsProvider {
    async fn complete(
        &self,
        http: &Client,
        api_key: &str,
        prompt: &Prompt<'_>,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request(prompt);

        debug!(provider = %self.provider, model = body.model, "chat completion request");

        let response = http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .into_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}
