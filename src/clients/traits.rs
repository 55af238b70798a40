use async_trait::async_trait;
use thiserror::Error;

use crate::suggestions::{SuggestionRequest, SuggestionResponse};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed engine response: {0}")]
    Malformed(String),
    #[error("engine not configured: {0}")]
    Config(String),
}

/// The external capability behind the gateway. Implementations may fail;
/// the gateway absorbs every failure.
#[async_trait]
pub trait SuggestionEngine: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest)
    -> Result<SuggestionResponse, EngineError>;

    /// Short label used in log entries
    fn name(&self) -> &str;
}
