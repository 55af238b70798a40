use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::clients::traits::{EngineError, SuggestionEngine};
use crate::clients::{build_http_client, map_send_error, parse_suggestion_payload, status_error};
use crate::config::SuggestionConfig;
use crate::suggestions::prompt::{SYSTEM_PROMPT, render_user_prompt, response_schema};
use crate::suggestions::{SuggestionRequest, SuggestionResponse};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` REST engine with JSON-mode output
#[derive(Clone, Debug)]
pub struct GeminiEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_ms: Option<u64>,
}

impl GeminiEngine {
    pub fn from_config(cfg: &SuggestionConfig, api_key: String) -> anyhow::Result<Self> {
        let endpoint = cfg
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            client: build_http_client(cfg.request_timeout_ms)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            timeout_ms: cfg.request_timeout_ms,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    pub fn build_body(&self, request: &SuggestionRequest) -> Value {
        json!({
            "systemInstruction": {
                "parts": [{"text": SYSTEM_PROMPT}]
            },
            "contents": [{
                "role": "user",
                "parts": [{"text": render_user_prompt(request)}]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

/// Pull the first candidate's text out of a `generateContent` response
pub fn extract_text(val: &Value) -> Result<&str, EngineError> {
    if let Some(reason) = val
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(EngineError::Malformed(format!("prompt blocked: {}", reason)));
    }

    let candidate = val
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| EngineError::Malformed("response has no candidates".into()))?;

    candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| {
            let finish = candidate
                .get("finishReason")
                .and_then(|r| r.as_str())
                .unwrap_or("unknown");
            EngineError::Malformed(format!("candidate has no text (finishReason={})", finish))
        })
}

#[async_trait]
impl SuggestionEngine for GeminiEngine {
    async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestionResponse, EngineError> {
        debug!("Calling Gemini (model={}, tasks={})", self.model, request.tasks.len());

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout_ms))?;

        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }

        let val: Value = resp
            .json()
            .await
            .map_err(|e| map_send_error(e, self.timeout_ms))?;

        parse_suggestion_payload(extract_text(&val)?)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
