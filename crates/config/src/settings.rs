//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Conversation agent configuration
    #[serde(default)]
    pub agent: AgentConfig,

    /// Business identity and appointment slot policy
    #[serde(default)]
    pub business: BusinessConfig,

    /// Optional language-model reply phrasing
    #[serde(default)]
    pub llm: LlmConfig,

    /// ScyllaDB persistence
    #[serde(default)]
    pub scylla: ScyllaSettings,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings, rejecting values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_active_calls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "agent.max_active_calls".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.agent.llm_timeout_ms < 100 {
            return Err(ConfigError::InvalidValue {
                field: "agent.llm_timeout_ms".to_string(),
                message: "timeout too low (minimum 100ms)".to_string(),
            });
        }

        if self.business.company_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "business.company_name".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if self.scylla.enabled && self.scylla.hosts.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scylla.hosts".to_string(),
                message: "at least one host is required when scylla is enabled".to_string(),
            });
        }

        if self.llm.api_key.is_some() && self.llm.model.trim().is_empty() {
            tracing::warn!("llm.api_key set without llm.model, using default model name");
        }

        Ok(())
    }
}

/// Load settings from an optional file plus HOMEDESK__ environment overrides
///
/// Precedence: defaults < file < environment. A missing file is not an
/// error; a malformed one is.
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path).required(false));
    }

    let config = builder
        .add_source(Environment::with_prefix("HOMEDESK").separator("__"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable permissive CORS for the dashboard
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
        }
    }
}

/// Conversation agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum concurrent in-progress calls
    #[serde(default = "default_max_active_calls")]
    pub max_active_calls: usize,

    /// Use the language model for reply phrasing when an API key is set
    #[serde(default = "default_true")]
    pub llm_replies: bool,

    /// Upper bound on one language-model call; the scripted reply is used
    /// when the model does not answer in time
    #[serde(default = "default_llm_timeout_ms")]
    pub llm_timeout_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_active_calls: default_max_active_calls(),
            llm_replies: true,
            llm_timeout_ms: default_llm_timeout_ms(),
        }
    }
}

/// Business identity and the fixed appointment slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    /// Company name spoken in greetings and confirmations
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Days from now to the proposed slot
    #[serde(default = "default_slot_days_ahead")]
    pub slot_days_ahead: i64,

    /// Slot time label stored on appointments
    #[serde(default = "default_slot_time")]
    pub slot_time: String,

    /// How the slot is spoken to the caller
    #[serde(default = "default_slot_spoken")]
    pub slot_spoken: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            slot_days_ahead: default_slot_days_ahead(),
            slot_time: default_slot_time(),
            slot_spoken: default_slot_spoken(),
        }
    }
}

/// Language-model configuration; the model is only used when an API key is
/// present, and only ever re-phrases scripted replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completions endpoint
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key; absence selects the scripted generator
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: None,
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
        }
    }
}

/// ScyllaDB settings; disabled means in-memory stores only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScyllaSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_scylla_hosts")]
    pub hosts: Vec<String>,

    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

impl Default for ScyllaSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format
    #[serde(default)]
    pub log_json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_max_active_calls() -> usize {
    100
}

fn default_llm_timeout_ms() -> u64 {
    2000
}

fn default_company_name() -> String {
    "HomeDesk".to_string()
}

fn default_slot_days_ahead() -> i64 {
    1
}

fn default_slot_time() -> String {
    "10:00 AM".to_string()
}

fn default_slot_spoken() -> String {
    "tomorrow morning at 10 AM".to_string()
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_temperature() -> f32 {
    0.7
}

fn default_llm_max_tokens() -> u32 {
    150
}

fn default_scylla_hosts() -> Vec<String> {
    vec!["127.0.0.1:9042".to_string()]
}

fn default_scylla_keyspace() -> String {
    "homedesk".to_string()
}

fn default_replication_factor() -> u8 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.agent.max_active_calls, 100);
        assert_eq!(settings.business.slot_time, "10:00 AM");
        assert!(settings.llm.api_key.is_none());
        assert!(!settings.scylla.enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut settings = Settings::default();
        settings.agent.max_active_calls = 0;

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_company() {
        let mut settings = Settings::default();
        settings.business.company_name = "  ".to_string();

        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_enabled_scylla_without_hosts() {
        let mut settings = Settings::default();
        settings.scylla.enabled = true;
        settings.scylla.hosts.clear();

        assert!(settings.validate().is_err());
    }
}
