use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::clients::traits::{EngineError, SuggestionEngine};
use crate::clients::{build_http_client, map_send_error, parse_suggestion_payload, status_error};
use crate::config::SuggestionConfig;
use crate::suggestions::prompt::{SYSTEM_PROMPT, render_user_prompt};
use crate::suggestions::{SuggestionRequest, SuggestionResponse};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8111";

/// OpenAI-compatible chat completions engine (llama.cpp, vLLM, Ollama, ...)
#[derive(Clone, Debug)]
pub struct LocalEngine {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    timeout_ms: Option<u64>,
    client: reqwest::Client,
}

impl LocalEngine {
    pub fn from_config(cfg: &SuggestionConfig, api_key: Option<String>) -> anyhow::Result<Self> {
        let endpoint = cfg
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        // Bare host:port gets the chat completions route appended
        let endpoint = if endpoint.ends_with("/v1/chat/completions") {
            endpoint
        } else {
            format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
        };

        Ok(Self {
            endpoint,
            model: cfg.model.clone(),
            api_key,
            temperature: cfg.temperature,
            timeout_ms: cfg.request_timeout_ms,
            client: build_http_client(cfg.request_timeout_ms)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_body(&self, request: &SuggestionRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": render_user_prompt(request)}
            ],
            "response_format": {"type": "json_object"},
            "temperature": self.temperature
        })
    }
}

pub fn extract_content(val: &Value) -> Result<&str, EngineError> {
    val["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| EngineError::Malformed("response has no choices[0].message.content".into()))
}

#[async_trait]
impl SuggestionEngine for LocalEngine {
    async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<SuggestionResponse, EngineError> {
        debug!("Calling local model endpoint {} (model={})", self.endpoint, self.model);

        let mut req = self.client.post(&self.endpoint).json(&self.build_body(request));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout_ms))?;

        if !res.status().is_success() {
            return Err(status_error(res).await);
        }

        let response_json: Value = res
            .json()
            .await
            .map_err(|e| map_send_error(e, self.timeout_ms))?;

        parse_suggestion_payload(extract_content(&response_json)?)
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_path_appended_once() {
        let mut cfg = SuggestionConfig::default();
        assert_eq!(
            LocalEngine::from_config(&cfg, None).unwrap().endpoint(),
            "http://127.0.0.1:8111/v1/chat/completions"
        );

        cfg.endpoint = Some("http://gpu-box:9000/v1/chat/completions".into());
        assert_eq!(
            LocalEngine::from_config(&cfg, None).unwrap().endpoint(),
            "http://gpu-box:9000/v1/chat/completions"
        );
    }

    #[test]
    fn test_body_uses_json_object_mode() {
        let engine = LocalEngine::from_config(&SuggestionConfig::default(), None).unwrap();
        let body = engine.build_body(&SuggestionRequest::default());
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[test]
    fn test_extract_content() {
        let val = json!({"choices": [{"message": {"content": "{}"}}]});
        assert_eq!(extract_content(&val).unwrap(), "{}");
        assert!(extract_content(&json!({"choices": []})).is_err());
    }
}
