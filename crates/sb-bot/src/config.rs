//! Bot server configuration.

use std::time::Duration;

use serde::Deserialize;

/// Top-level bot server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection URL. None runs the in-memory store.
    pub database_url: Option<String>,
    /// AI intent-enrichment settings.
    #[serde(skip)]
    pub ai: AiConfig,
}

/// Settings for the OpenAI intent enricher.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Master switch (AI_INTENT_ENABLED env var).
    pub enabled: bool,
    /// API key; the enricher is disabled without one.
    pub api_key: Option<String>,
    /// Chat-completions model id.
    pub model: String,
    /// API base URL, overridable for tests.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

impl BotConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_port);
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port,
            database_url: std::env::var("DATABASE_URL").ok(),
            ai: AiConfig::from_env(),
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        let enabled = std::env::var("AI_INTENT_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);
        let timeout_secs: u64 = std::env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);
        Self {
            enabled,
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| default_model()),
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| default_base_url()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            ai: AiConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout: Duration::from_secs(5),
        }
    }
}
