use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::errors::AppError;
use crate::llm_client::{Credential, Provider};
use crate::session::store::DEFAULT_IDLE_TTL;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Application configuration loaded from environment variables.
/// Every variable is optional; provider keys may instead arrive with each request.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub default_provider: Provider,
    /// Sessions untouched for this long are dropped, history included.
    pub session_idle_ttl_secs: u64,
    pub api_keys: ProviderKeys,
    pub endpoints: ProviderEndpoints,
}

/// Fallback credentials used when a request carries no `api_key`.
#[derive(Clone, Default)]
pub struct ProviderKeys {
    pub openai: Option<String>,
    pub gemini: Option<String>,
    pub mistral: Option<String>,
}

impl std::fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderKeys")
            .field("openai", &self.openai.is_some())
            .field("gemini", &self.gemini.is_some())
            .field("mistral", &self.mistral.is_some())
            .finish()
    }
}

/// Base URLs of the hosted providers. Overridable for proxies and local mocks.
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub openai: String,
    pub gemini: String,
    pub mistral: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            openai: OPENAI_BASE_URL.to_string(),
            gemini: GEMINI_BASE_URL.to_string(),
            mistral: MISTRAL_BASE_URL.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            default_provider: Provider::Mistral,
            session_idle_ttl_secs: DEFAULT_IDLE_TTL.as_secs(),
            api_keys: ProviderKeys::default(),
            endpoints: ProviderEndpoints::default(),
        }
    }
}

/// Which provider a request wants and, optionally, the key to use for it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelSelection {
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            default_provider: match optional_env("DEFAULT_PROVIDER") {
                Some(name) => name
                    .parse()
                    .map_err(|e| anyhow!("DEFAULT_PROVIDER: {e}"))?,
                None => defaults.default_provider,
            },
            session_idle_ttl_secs: match optional_env("SESSION_IDLE_TTL_SECS") {
                Some(secs) => secs
                    .parse::<u64>()
                    .context("SESSION_IDLE_TTL_SECS must be a number of seconds")?,
                None => defaults.session_idle_ttl_secs,
            },
            api_keys: ProviderKeys {
                openai: optional_env("OPENAI_API_KEY"),
                gemini: optional_env("GEMINI_API_KEY"),
                mistral: optional_env("MISTRAL_API_KEY"),
            },
            endpoints: ProviderEndpoints {
                openai: optional_env("OPENAI_BASE_URL").unwrap_or(defaults.endpoints.openai),
                gemini: optional_env("GEMINI_BASE_URL").unwrap_or(defaults.endpoints.gemini),
                mistral: optional_env("MISTRAL_BASE_URL").unwrap_or(defaults.endpoints.mistral),
            },
        })
    }

    /// Resolves the credential for a request: the request's own key wins,
    /// then the configured key for the chosen provider.
    pub fn credential(&self, selection: &ModelSelection) -> Result<Credential, AppError> {
        let provider = selection.provider.unwrap_or(self.default_provider);

        let supplied = selection
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        let configured = match provider {
            Provider::OpenAi => self.api_keys.openai.as_deref(),
            Provider::Gemini => self.api_keys.gemini.as_deref(),
            Provider::Mistral => self.api_keys.mistral.as_deref(),
        };

        supplied
            .or(configured)
            .map(|key| Credential::new(provider, key))
            .ok_or(AppError::MissingCredential(provider))
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
