//! OpenAI provider implementation.
//!
//! Chat goes through the Responses API, images through the Images API. Each
//! invocation issues exactly one outbound call; the response body is
//! buffered and parsed as JSON, never streamed.

use super::{ChatProvider, ChatTurn, ImageProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

/// OpenAI chat and image provider.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// The credential is checked before any network call. An empty value is
    /// a per-request configuration error, not a startup failure.
    fn require_key(&self) -> Result<(), ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Missing OPENAI_API_KEY".to_string(),
            ));
        }
        Ok(())
    }

    async fn post_json<T: Serialize>(
        &self,
        path: &str,
        request: &T,
    ) -> Result<(reqwest::StatusCode, Value), ProviderError> {
        let response = self
            .client
            .post(self.api_url(path))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok((status, body))
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn generate(&self, turns: &[ChatTurn]) -> Result<String, ProviderError> {
        self.require_key()?;

        let request = ResponsesRequest {
            model: &self.config.text_model,
            input: turns,
        };

        tracing::debug!(
            model = %self.config.text_model,
            turn_count = turns.len(),
            "Sending chat request to OpenAI"
        );

        let (status, body) = self.post_json("responses", &request).await?;

        if !status.is_success() {
            return Err(upstream_failure(
                status.as_u16(),
                body,
                "OpenAI request failed",
            ));
        }

        let payload: ResponsesPayload = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::Api(format!("Failed to parse response: {}", e)))?;

        match extract_reply(&payload) {
            Some(reply) => Ok(reply),
            None => Err(ProviderError::EmptyResponse {
                message: "No reply returned by model".to_string(),
                raw: body,
            }),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.require_key()
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str, size: &str) -> Result<String, ProviderError> {
        self.require_key()?;

        let request = ImagesRequest {
            model: &self.config.image_model,
            prompt,
            size,
        };

        tracing::debug!(
            model = %self.config.image_model,
            size = %size,
            "Sending image request to OpenAI"
        );

        let (status, body) = self.post_json("images/generations", &request).await?;

        if !status.is_success() {
            return Err(upstream_failure(status.as_u16(), body, "OpenAI error"));
        }

        let payload: ImagesPayload = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::Api(format!("Failed to parse response: {}", e)))?;

        match extract_image_url(&payload) {
            Some(url) => Ok(url),
            None => Err(ProviderError::EmptyResponse {
                message: "No image URL returned".to_string(),
                raw: body,
            }),
        }
    }
}

/// Builds the pass-through failure for a non-success upstream status. The
/// message comes from the structured error field when present.
fn upstream_failure(status: u16, raw: Value, fallback: &str) -> ProviderError {
    let message = raw
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string();

    ProviderError::Upstream {
        status,
        message,
        raw,
    }
}

/// Ordered fallback chain for the reply text: the first output item's
/// `output_text` content entry, then the flattened top-level `output_text`.
fn extract_reply(payload: &ResponsesPayload) -> Option<String> {
    payload
        .output
        .first()
        .and_then(|item| item.content.iter().find(|c| c.kind == "output_text"))
        .map(|c| c.text.clone())
        .filter(|text| !text.is_empty())
        .or_else(|| {
            payload
                .output_text
                .clone()
                .filter(|text| !text.is_empty())
        })
}

fn extract_image_url(payload: &ImagesPayload) -> Option<String> {
    payload.data.first().and_then(|image| image.url.clone())
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [ChatTurn],
}

#[derive(Debug, Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesPayload {
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    output_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ImagesPayload {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    url: Option<String>,
}
