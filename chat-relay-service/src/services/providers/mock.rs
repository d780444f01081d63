//! Mock provider implementations for testing.

use super::{ChatProvider, ChatTurn, ImageProvider, ProviderError};
use async_trait::async_trait;

/// Mock chat provider returning a scripted outcome.
pub struct MockChatProvider {
    outcome: Result<String, ProviderError>,
}

impl MockChatProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            outcome: Ok(reply.to_string()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn generate(&self, _turns: &[ChatTurn]) -> Result<String, ProviderError> {
        self.outcome.clone()
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.outcome.clone().map(|_| ())
    }
}

/// Mock image provider returning a scripted outcome.
pub struct MockImageProvider {
    outcome: Result<String, ProviderError>,
}

impl MockImageProvider {
    pub fn returning(url: &str) -> Self {
        Self {
            outcome: Ok(url.to_string()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, _prompt: &str, _size: &str) -> Result<String, ProviderError> {
        self.outcome.clone()
    }
}
