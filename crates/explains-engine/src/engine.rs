use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use explains_core::EngineConfig;

use crate::capture::OutputChannel;
use crate::error::EngineError;

/// Something that answers a question by printing to an [`OutputChannel`].
///
/// The return value only signals failure; the answer itself is whatever the
/// engine wrote to `out` while running.
#[async_trait]
pub trait ExplanationEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn run(
        &self,
        config: EngineConfig,
        text: &str,
        out: &OutputChannel,
    ) -> Result<(), EngineError>;
}

/// Engine backed by an OpenAI-compatible chat completions endpoint.
///
/// Every key in `EngineConfig::extra` is copied into the request body, so
/// sampling parameters like `temperature` can be set from the environment.
pub struct HttpEngine {
    client: reqwest::Client,
}

impl HttpEngine {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExplanationEngine for HttpEngine {
    fn name(&self) -> &str {
        "http"
    }

    async fn run(
        &self,
        config: EngineConfig,
        text: &str,
        out: &OutputChannel,
    ) -> Result<(), EngineError> {
        let url = format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/'));
        let body = build_request_body(&config, text);

        debug!(model = %config.model, "sending request to explanation engine");

        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(key) = &config.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "explanation engine API error");
            return Err(EngineError::Api {
                status,
                message: text,
            });
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| EngineError::Parse(e.to_string()))?;

        let answer = extract_answer(api_resp)?;
        out.write_str(&answer);
        Ok(())
    }
}

fn build_request_body(config: &EngineConfig, text: &str) -> serde_json::Value {
    let mut messages = Vec::new();
    if let Some(system) = &config.system_prompt {
        messages.push(serde_json::json!({ "role": "system", "content": system }));
    }
    messages.push(serde_json::json!({ "role": "user", "content": text }));

    let mut body = serde_json::Map::new();
    for (k, v) in &config.extra {
        body.insert(k.clone(), v.clone());
    }
    body.insert("model".to_string(), serde_json::json!(config.model));
    body.insert("messages".to_string(), serde_json::Value::Array(messages));
    serde_json::Value::Object(body)
}

fn extract_answer(resp: ApiResponse) -> Result<String, EngineError> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| EngineError::Parse("response has no answer content".to_string()))
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
