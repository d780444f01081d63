//! Upstream provider abstractions and implementations.
//!
//! Handlers work against trait objects so the OpenAI backend can be swapped
//! for mocks in tests.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Upstream error {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        raw: Value,
    },

    #[error("{message}")]
    EmptyResponse { message: String, raw: Value },

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Upstream-facing role of a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Normalizes an inbound role string. Anything that is not exactly
    /// "assistant" becomes a user turn.
    pub fn normalize(raw: &str) -> Self {
        if raw == "assistant" {
            Role::Assistant
        } else {
            Role::User
        }
    }
}

/// A single turn sent to the upstream chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Trait for chat completion providers.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends the assembled turns upstream and returns the extracted reply.
    async fn generate(&self, turns: &[ChatTurn]) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Trait for image generation providers.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates one image and returns its URL.
    async fn generate(&self, prompt: &str, size: &str) -> Result<String, ProviderError>;
}
