//! Suggestion gateway: the one entry point callers use to ask for a next task.
//!
//! The gateway is total. Whatever the engine does (times out, returns an HTTP
//! error, answers with garbage, or was never configured), the caller receives a
//! well-formed [`SuggestionResponse`]. Failure detail goes to the log only.

pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clients::{SuggestionEngine, UnavailableEngine, create_engine};
use crate::config::Config;

pub const FALLBACK_SUGGESTED_TASK: &str = "Could not generate suggestion";
pub const FALLBACK_REASONING: &str =
    "There was an issue connecting to the AI service. Please check your configuration and try again.";

/// A task the caller already knows about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TaskItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
            due: None,
            notes: None,
        }
    }
}

/// Input to the gateway. Not validated here; the engine decides what it accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub suggested_task: String,
    pub reasoning: String,
}

impl SuggestionResponse {
    pub fn new(suggested_task: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            suggested_task: suggested_task.into(),
            reasoning: reasoning.into(),
        }
    }

    /// The fixed substitute returned whenever the engine fails
    pub fn fallback() -> Self {
        Self::new(FALLBACK_SUGGESTED_TASK, FALLBACK_REASONING)
    }

    pub fn is_fallback(&self) -> bool {
        self.suggested_task == FALLBACK_SUGGESTED_TASK && self.reasoning == FALLBACK_REASONING
    }
}

/// Mediates between a caller and a [`SuggestionEngine`]
#[derive(Clone)]
pub struct SuggestionGateway {
    engine: Arc<dyn SuggestionEngine>,
}

impl SuggestionGateway {
    pub fn new(engine: Arc<dyn SuggestionEngine>) -> Self {
        Self { engine }
    }

    /// Build a gateway from configuration.
    ///
    /// Never fails: when the engine cannot be built, the gateway answers every
    /// call with the fallback and logs the configuration problem per call.
    pub fn from_config(config: &Config) -> Self {
        let engine: Arc<dyn SuggestionEngine> = match create_engine(config) {
            Ok(engine) => engine,
            Err(err) => {
                tracing::warn!("Suggestion engine unavailable: {}", err);
                Arc::new(UnavailableEngine::new(err.to_string()))
            }
        };
        Self::new(engine)
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Ask the engine for the next task. Always returns a response.
    pub async fn suggest_next_task(&self, request: &SuggestionRequest) -> SuggestionResponse {
        tracing::debug!(
            engine = self.engine.name(),
            tasks = request.tasks.len(),
            "Requesting next task suggestion"
        );

        match self.engine.suggest(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(
                    engine = self.engine.name(),
                    error = %err,
                    "Error suggesting next task"
                );
                SuggestionResponse::fallback()
            }
        }
    }
}
