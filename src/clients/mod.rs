pub mod gemini;
pub mod local;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::suggestions::{SuggestionRequest, SuggestionResponse};

pub use gemini::GeminiEngine;
pub use local::LocalEngine;
pub use traits::{EngineError, SuggestionEngine};

/// Upper bound on how much of an error body ends up in a log line
const ERROR_BODY_CAP: usize = 2048;

/// Build the engine selected by `[suggestions].provider`
pub fn create_engine(config: &Config) -> anyhow::Result<Arc<dyn SuggestionEngine>> {
    let is_placeholder = |s: &str| {
        let t = s.trim();
        t.is_empty()
            || t.contains("${")
            || t.eq_ignore_ascii_case("your-api-key-here")
            || t.eq_ignore_ascii_case("changeme")
    };

    let suggestions = &config.suggestions;
    match suggestions.provider.as_str() {
        "gemini" => {
            let key = config.runtime.gemini_api_key.clone().unwrap_or_default();
            if is_placeholder(&key) {
                anyhow::bail!("provider=gemini but GEMINI_API_KEY is not set");
            }
            info!("Using Gemini suggestion engine (model={})", suggestions.model);
            Ok(Arc::new(GeminiEngine::from_config(suggestions, key)?))
        }
        "local" => {
            let key = config
                .runtime
                .local_api_key
                .clone()
                .filter(|k| !is_placeholder(k));
            info!("Using local suggestion engine (model={})", suggestions.model);
            Ok(Arc::new(LocalEngine::from_config(suggestions, key)?))
        }
        other => anyhow::bail!("Unknown suggestion provider '{}' (expected gemini or local)", other),
    }
}

/// Stand-in engine for a gateway whose real engine could not be built
#[derive(Debug, Clone)]
pub struct UnavailableEngine {
    reason: String,
}

impl UnavailableEngine {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SuggestionEngine for UnavailableEngine {
    async fn suggest(
        &self,
        _request: &SuggestionRequest,
    ) -> Result<SuggestionResponse, EngineError> {
        Err(EngineError::Config(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

pub(crate) fn build_http_client(timeout_ms: Option<u64>) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(ms) = timeout_ms {
        builder = builder.timeout(Duration::from_millis(ms));
    }
    builder.build().context("Failed to build reqwest client")
}

pub(crate) fn map_send_error(err: reqwest::Error, timeout_ms: Option<u64>) -> EngineError {
    if err.is_timeout() {
        EngineError::Timeout {
            timeout_ms: timeout_ms.unwrap_or_default(),
        }
    } else if err.is_decode() {
        EngineError::Malformed(err.to_string())
    } else {
        EngineError::Transport(err.to_string())
    }
}

/// Turn a non-success HTTP response into an error, reading a capped body
pub(crate) async fn status_error(resp: reqwest::Response) -> EngineError {
    let status = resp.status().as_u16();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response body".to_string());
    let body: String = body.chars().take(ERROR_BODY_CAP).collect();
    EngineError::Status { status, body }
}

/// Parse the model's text output into a response.
///
/// Models sometimes wrap JSON in Markdown fences even in JSON mode, so those
/// are stripped first. Both fields must be present and non-blank.
pub fn parse_suggestion_payload(text: &str) -> Result<SuggestionResponse, EngineError> {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // Drop the info string on the fence line (json, JSON, ...)
        let rest = match rest.split_once('\n') {
            Some((_, after)) => after,
            None => rest,
        };
        body = rest.strip_suffix("```").unwrap_or(rest).trim();
    }

    let parsed: SuggestionResponse = serde_json::from_str(body)
        .map_err(|e| EngineError::Malformed(format!("invalid suggestion JSON: {}", e)))?;

    if parsed.suggested_task.trim().is_empty() || parsed.reasoning.trim().is_empty() {
        return Err(EngineError::Malformed(
            "suggestion is missing suggestedTask or reasoning".into(),
        ));
    }

    Ok(parsed)
}
