//! TOML-based configuration for deep-research
//!
//! Everything the binary needs to assemble a coordinator lives in a single
//! `research.toml`: the model provider, optional per-stage model overrides,
//! workflow sizes, search concurrency, and the notification transport. Secrets
//! are never stored in the file; sections name the environment variable that
//! holds them instead.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working local setup against Ollama.

use crate::agents::clarifier::DEFAULT_CLARIFICATION_QUESTIONS;
use crate::agents::planner::DEFAULT_SEARCHES_PER_PLAN;
use crate::llm::Provider;
use crate::research::gather::GatherOptions;
use crate::types::ResearchError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name
pub const DEFAULT_CONFIG_FILE: &str = "research.toml";

/// Largest accepted clarification question count
pub const MAX_CLARIFICATION_QUESTIONS: usize = 10;

/// Root configuration structure loaded from research.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    /// Per-stage model overrides on top of the provider's model
    #[serde(default)]
    pub models: StageModels,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub notification: NotificationConfig,
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence when set
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default = "default_ollama_model")]
        model: String,
    },
    OpenAI {
        /// Environment variable containing API key
        #[serde(default = "default_openai_key_env")]
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
        #[serde(default = "default_openai_model")]
        model: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Ollama {
            base_url: default_ollama_url(),
            model: default_ollama_model(),
        }
    }
}

/// Optional model names overriding the provider's default per stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageModels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<String>,
}

// ============= Workflow Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_clarification_questions")]
    pub clarification_questions: usize,

    #[serde(default = "default_searches_per_plan")]
    pub searches_per_plan: usize,
}

fn default_clarification_questions() -> usize {
    DEFAULT_CLARIFICATION_QUESTIONS
}

fn default_searches_per_plan() -> usize {
    DEFAULT_SEARCHES_PER_PLAN
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            clarification_questions: default_clarification_questions(),
            searches_per_plan: default_searches_per_plan(),
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Cap on concurrently running search tasks; unset runs all at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,

    /// Per-task deadline in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Ground search summaries on live web results
    #[serde(default = "default_true")]
    pub web_lookup: bool,

    /// Web hits fed to each search summary
    #[serde(default = "default_web_results")]
    pub web_results: usize,
}

fn default_true() -> bool {
    true
}

fn default_web_results() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: None,
            timeout_secs: None,
            web_lookup: default_true(),
            web_results: default_web_results(),
        }
    }
}

impl SearchConfig {
    pub fn gather_options(&self) -> GatherOptions {
        GatherOptions {
            max_concurrent: self.max_concurrent,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

// ============= Notification Configuration =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotificationConfig {
    /// Log the finished report
    #[default]
    Log,
    SendGrid {
        /// Environment variable containing API key
        #[serde(default = "default_sendgrid_key_env")]
        api_key_env: String,
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },
}

fn default_sendgrid_key_env() -> String {
    "SENDGRID_API_KEY".to_string()
}

// ============= Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl From<ConfigError> for ResearchError {
    fn from(err: ConfigError) -> Self {
        ResearchError::Configuration(err.to_string())
    }
}

impl ResearchConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// The flag reports whether a file was read.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool), ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::load(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Check value ranges. Environment variables are checked later, when a
    /// provider or transport is actually built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.clarification_questions > MAX_CLARIFICATION_QUESTIONS {
            return Err(ConfigError::ValidationError(format!(
                "workflow.clarification_questions must be at most {} (got {})",
                MAX_CLARIFICATION_QUESTIONS, self.workflow.clarification_questions
            )));
        }

        if self.workflow.searches_per_plan == 0 {
            return Err(ConfigError::ValidationError(
                "workflow.searches_per_plan must be at least 1".to_string(),
            ));
        }

        if self.search.max_concurrent == Some(0) {
            return Err(ConfigError::ValidationError(
                "search.max_concurrent must be at least 1 when set".to_string(),
            ));
        }

        if self.search.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "search.timeout_secs must be at least 1 when set".to_string(),
            ));
        }

        match &self.provider {
            ProviderConfig::Ollama { base_url, model }
            | ProviderConfig::OpenAI {
                api_base: base_url,
                model,
                ..
            } => {
                if model.trim().is_empty() {
                    return Err(ConfigError::ValidationError(
                        "provider.model cannot be empty".to_string(),
                    ));
                }
                if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                    return Err(ConfigError::ValidationError(format!(
                        "provider URL must start with http:// or https:// (got '{}')",
                        base_url
                    )));
                }
            }
        }

        if let NotificationConfig::SendGrid { from, to, .. } = &self.notification {
            for (field, address) in [("from", from), ("to", to)] {
                if !address.contains('@') {
                    return Err(ConfigError::ValidationError(format!(
                        "notification.{} must be an email address (got '{}')",
                        field, address
                    )));
                }
            }
        }

        Ok(())
    }

    /// Resolve the configured provider, reading its API key from the environment
    pub fn provider(&self) -> Result<Provider, ConfigError> {
        match &self.provider {
            ProviderConfig::Ollama { base_url, model } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            }),
            ProviderConfig::OpenAI {
                api_key_env,
                api_base,
                model,
            } => Ok(Provider::OpenAI {
                api_key: Self::validate_env_var(api_key_env)?,
                api_base: api_base.clone(),
                model: model.clone(),
            }),
        }
    }

    /// Read a referenced environment variable, rejecting unset or blank values
    pub fn validate_env_var(name: &str) -> Result<String, ConfigError> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(name.to_string())),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(format!("cannot render config: {}", e)))
    }
}
