//! Model gateway: the single point of entry for all hosted-model calls in Crisis Ops.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! All model interactions MUST go through `TextGenerator::generate`.
//!
//! Failure policy: a gateway call never returns an error. Transport, auth and
//! provider failures come back as a `⚠`-prefixed string that callers store and
//! display like ordinary model output. There is no retry and no backoff.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ProviderEndpoints;

pub mod chat_completions;
pub mod gemini;
pub mod prompts;

use chat_completions::ChatCompletionsProvider;
use gemini::GeminiProvider;

/// Output ceiling applied to every provider request.
pub const MAX_TOKENS: u32 = 2000;
/// Sampling temperature used when a caller has no persona preference.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response blocked by provider: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Providers and credentials
// ────────────────────────────────────────────────────────────────────────────

/// The hosted providers a trainee can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(alias = "OpenAI (GPT-4o)")]
    OpenAi,
    #[serde(alias = "Google Gemini")]
    Gemini,
    #[serde(alias = "Mistral AI")]
    Mistral,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Mistral, Provider::Gemini, Provider::OpenAi];

    /// Model identifier sent to the provider. Hardcoded to prevent drift.
    pub fn model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o",
            Provider::Gemini => "gemini-2.5-flash",
            Provider::Mistral => "mistral-small-latest",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI (GPT-4o)",
            Provider::Gemini => "Google Gemini",
            Provider::Mistral => "Mistral AI",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
            Provider::Mistral => "mistral",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(provider) = Provider::ALL.into_iter().find(|p| p.label().eq_ignore_ascii_case(s)) {
            return Ok(provider);
        }
        match s.to_ascii_lowercase().as_str() {
            "openai" | "gpt" | "gpt-4o" => Ok(Provider::OpenAi),
            "gemini" | "google" => Ok(Provider::Gemini),
            "mistral" => Ok(Provider::Mistral),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

/// A provider plus the API key to call it with.
#[derive(Clone)]
pub struct Credential {
    pub provider: Provider,
    pub api_key: String,
}

impl Credential {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
        }
    }
}

// Keys never reach the logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// The normalized two-instruction request every provider receives.
#[derive(Debug, Clone, Copy)]
pub struct Prompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

/// One hosted provider's request/response shape.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn complete(
        &self,
        http: &Client,
        api_key: &str,
        prompt: &Prompt<'_>,
    ) -> Result<String, LlmError>;
}

/// The gateway capability consumed by the simulation.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so tests can swap in a stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        credential: &Credential,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> String;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmClient: the production gateway
// ────────────────────────────────────────────────────────────────────────────

/// Dispatches gateway calls to the provider named in the credential.
pub struct LlmClient {
    http: Client,
    openai: ChatCompletionsProvider,
    gemini: GeminiProvider,
    mistral: ChatCompletionsProvider,
}

impl LlmClient {
    pub fn new(endpoints: &ProviderEndpoints) -> Self {
        Self {
            http: Client::new(),
            openai: ChatCompletionsProvider::new(Provider::OpenAi, &endpoints.openai),
            gemini: GeminiProvider::new(&endpoints.gemini),
            mistral: ChatCompletionsProvider::new(Provider::Mistral, &endpoints.mistral),
        }
    }

    fn backend(&self, provider: Provider) -> &dyn ModelProvider {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Gemini => &self.gemini,
            Provider::Mistral => &self.mistral,
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        credential: &Credential,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> String {
        let prompt = Prompt {
            system,
            user,
            temperature,
        };

        match self
            .backend(credential.provider)
            .complete(&self.http, &credential.api_key, &prompt)
            .await
        {
            Ok(text) => {
                debug!(
                    provider = %credential.provider,
                    chars = text.chars().count(),
                    "model call succeeded"
                );
                text
            }
            Err(e) => {
                warn!(provider = %credential.provider, error = %e, "model call failed, returning inline error");
                inline_error(&e)
            }
        }
    }
}

/// Formats a gateway failure as displayable content.
pub fn inline_error(error: &LlmError) -> String {
    format!("{}{error}", prompts::GATEWAY_ERROR_PREFIX)
}

/// True when `text` is an inline gateway failure rather than model output.
pub fn is_gateway_error(text: &str) -> bool {
    text.starts_with(prompts::GATEWAY_ERROR_MARKER)
}

/// Pulls a human-readable message out of a provider error body.
/// Handles `{"error":{"message":..}}`, `{"message":..}` and `{"detail":..}`; falls back to the raw body.
pub(crate) fn api_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .or_else(|| v.get("detail"))
        })
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Response sanitizer
// ────────────────────────────────────────────────────────────────────────────

/// Strips ```lang ... ``` wrapping from model output.
///
/// A closing fence is only removed together with the opening fence it matches,
/// so code blocks inside the body keep both of their fences. Wrappers are
/// peeled until nothing changes, which makes `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let mut current = text.trim();
    loop {
        let next = strip_fence_once(current);
        if next.len() == current.len() {
            return current.to_string();
        }
        current = next;
    }
}

fn strip_fence_once(text: &str) -> &str {
    let text = text.trim();

    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let Some(body) = rest[tag_len..].strip_prefix('\n') else {
        return text;
    };

    let body = if body == "```" {
        ""
    } else {
        body.strip_suffix("\n```").unwrap_or(body)
    };
    body.trim()
}
