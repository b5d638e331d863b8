use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub classifier: Option<ClassifierConfig>,
    #[serde(default)]
    pub crisis: CrisisConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8000
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("relief.db")
}

/// Text classification backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    /// Google Gemini (generateContent REST API).
    Gemini,
    /// Anthropic Messages API.
    Anthropic,
    /// Local Ollama instance.
    Ollama,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Ollama => "ollama",
        }
    }

    /// Hosted providers cannot be called without an API key.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmProvider::Ollama)
    }
}

/// Classifier (LLM) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub provider: LlmProvider,
    /// Model name/identifier.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom API base URL (for proxies or self-hosted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_tokens() -> u32 {
    1024
}

/// Crisis escalation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrisisConfig {
    /// Ordered list of locations asked for support when a crisis is declared.
    #[serde(default = "default_nearby_locations")]
    pub nearby_locations: Vec<String>,
    /// How many entries of `nearby_locations` are considered per escalation.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Upper bound on notifications returned per request.
    #[serde(default = "default_notification_limit")]
    pub notification_limit: usize,
}

impl Default for CrisisConfig {
    fn default() -> Self {
        Self {
            nearby_locations: default_nearby_locations(),
            max_candidates: default_max_candidates(),
            notification_limit: default_notification_limit(),
        }
    }
}

fn default_nearby_locations() -> Vec<String> {
    [
        "İstanbul", "Ankara", "İzmir", "Bursa", "Samsun", "Adana", "Konya", "Antalya",
        "Kocaeli", "Mersin",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_candidates() -> usize {
    3
}

fn default_notification_limit() -> usize {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier: Option<SanitizedClassifierConfig>,
    pub crisis: CrisisConfig,
}

/// Sanitized classifier config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedClassifierConfig {
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            classifier: config
                .classifier
                .as_ref()
                .map(|c| SanitizedClassifierConfig {
                    provider: c.provider.as_str().to_string(),
                    model: c.model.clone(),
                    api_base: c.api_base.clone(),
                    api_key_configured: c.api_key.as_deref().is_some_and(|k| !k.is_empty()),
                    timeout_secs: c.timeout_secs,
                }),
            crisis: config.crisis.clone(),
        }
    }
}
