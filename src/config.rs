use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskwiseError};

pub const DEFAULT_CONFIG_PATH: &str = "taskwise.toml";
pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_LOG_LEVEL: &str = "taskwise=info";

/// Main configuration structure loaded from taskwise.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub suggestions: SuggestionConfig,
    pub document_ai: DocumentAiConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Settings for the external suggestion engine
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// `gemini` or `local`
    pub provider: String,
    pub model: String,
    /// Base URL override; each provider has its own default
    pub endpoint: Option<String>,
    pub temperature: f32,
    /// Unset means the engine call is not bounded by a client-side timeout
    pub request_timeout_ms: Option<u64>,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: None,
            temperature: 0.2,
            request_timeout_ms: None,
        }
    }
}

/// Document AI project settings, used to build full processor resource names
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DocumentAiConfig {
    pub project_id: Option<String>,
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub gemini_api_key: Option<String>,
    pub local_api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            local_api_key: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load runtime configuration through an arbitrary variable lookup
    pub fn load_from(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            gemini_api_key: get("GEMINI_API_KEY")
                .or_else(|| get("GOOGLE_API_KEY"))
                .filter(|k| !k.trim().is_empty()),
            local_api_key: get("LOCAL_AI_API_KEY").filter(|k| !k.trim().is_empty()),
            log_level: get("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Config {
    /// Load `.env` into the process environment.
    /// TASKWISE_ENV_FILE if set, otherwise ./.env; already-set variables win.
    pub fn load_env_file() {
        if let Ok(env_path) = std::env::var("TASKWISE_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }
    }

    /// Load configuration from TOML file and environment variables
    /// Uses TASKWISE_CONFIG environment variable or defaults to "taskwise.toml"
    pub fn load() -> Result<Self> {
        Self::load_env_file();

        let config_path = std::env::var("TASKWISE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::load_from_path(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.runtime = RuntimeConfig::load_from_env();
        config.validate();

        Ok(config)
    }

    /// Read the TOML file at `path`. A missing file yields defaults; any other
    /// read failure is an error.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(TaskwiseError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Parse the file portion of the configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env-first overrides on top of file values
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = get("TASKWISE_AI_PROVIDER") {
            tracing::debug!("TASKWISE_AI_PROVIDER env override applied");
            self.suggestions.provider = provider;
        }
        if let Some(model) = get("TASKWISE_AI_MODEL").filter(|m| !m.trim().is_empty()) {
            tracing::debug!("TASKWISE_AI_MODEL env override applied");
            self.suggestions.model = model;
        }
        if let Some(endpoint) = get("TASKWISE_AI_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            tracing::debug!("TASKWISE_AI_ENDPOINT env override applied");
            self.suggestions.endpoint = Some(endpoint);
        }
        if let Some(raw) = get("TASKWISE_AI_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => self.suggestions.request_timeout_ms = Some(ms),
                Err(_) => tracing::warn!("Ignoring non-numeric TASKWISE_AI_TIMEOUT_MS '{}'", raw),
            }
        }
        if let Some(project) = get("TASKWISE_DOCAI_PROJECT").filter(|p| !p.trim().is_empty()) {
            self.document_ai.project_id = Some(project);
        }
    }

    /// Normalize values that would otherwise surprise the engines
    pub fn validate(&mut self) {
        self.suggestions.provider = self.suggestions.provider.trim().to_lowercase();

        let temp = self.suggestions.temperature;
        if !(0.0..=2.0).contains(&temp) {
            let clamped = if temp.is_nan() { 0.2 } else { temp.clamp(0.0, 2.0) };
            tracing::warn!("temperature {} out of range, clamping to {}", temp, clamped);
            self.suggestions.temperature = clamped;
        }

        if self.suggestions.request_timeout_ms == Some(0) {
            tracing::warn!("request_timeout_ms = 0 disables the client timeout");
            self.suggestions.request_timeout_ms = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_have_no_timeout() {
        let config = Config::default();
        assert_eq!(config.suggestions.provider, "gemini");
        assert_eq!(config.suggestions.request_timeout_ms, None);
        assert_eq!(config.document_ai.project_id, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [suggestions]
            model = "gemini-1.5-pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.suggestions.model, "gemini-1.5-pro");
        assert_eq!(config.suggestions.provider, "gemini");
        assert_eq!(config.suggestions.temperature, 0.2);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("taskwise-does-not-exist/taskwise.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.suggestions.provider, DEFAULT_PROVIDER);
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        // A directory exists but cannot be read as a file
        let dir = std::env::temp_dir();
        match Config::load_from_path(&dir) {
            Err(TaskwiseError::Io { path, .. }) => assert_eq!(path, dir.display().to_string()),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml_str("[suggestions\nmodel = 1").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let mut config = Config::from_toml_str(
            r#"
            [suggestions]
            provider = "gemini"
            request_timeout_ms = 5000

            [document_ai]
            project_id = "from-file"
            "#,
        )
        .unwrap();
        config.apply_overrides(lookup(&[
            ("TASKWISE_AI_PROVIDER", "local"),
            ("TASKWISE_AI_TIMEOUT_MS", "250"),
            ("TASKWISE_DOCAI_PROJECT", "from-env"),
        ]));
        assert_eq!(config.suggestions.provider, "local");
        assert_eq!(config.suggestions.request_timeout_ms, Some(250));
        assert_eq!(config.document_ai.project_id.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_bad_timeout_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[("TASKWISE_AI_TIMEOUT_MS", "soon")]));
        assert_eq!(config.suggestions.request_timeout_ms, None);
    }

    #[test]
    fn test_validate_clamps_and_normalizes() {
        let mut config = Config::default();
        config.suggestions.provider = "  Gemini ".into();
        config.suggestions.temperature = 7.5;
        config.suggestions.request_timeout_ms = Some(0);
        config.validate();
        assert_eq!(config.suggestions.provider, "gemini");
        assert_eq!(config.suggestions.temperature, 2.0);
        assert_eq!(config.suggestions.request_timeout_ms, None);
    }

    #[test]
    fn test_runtime_key_fallback() {
        let runtime = RuntimeConfig::load_from(lookup(&[("GOOGLE_API_KEY", "g-key")]));
        assert_eq!(runtime.gemini_api_key.as_deref(), Some("g-key"));
        assert_eq!(runtime.log_level, DEFAULT_LOG_LEVEL);

        let runtime = RuntimeConfig::load_from(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("GOOGLE_API_KEY", "secondary"),
        ]));
        assert_eq!(runtime.gemini_api_key.as_deref(), Some("primary"));
    }
}
