//! Request and response payloads for the relay endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Inbound chat request.
///
/// Every field is optional on the wire; an absent message is treated as an
/// empty string. `personalization` is a legacy alias for `system` and loses
/// when both are present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub personalization: Option<String>,
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
    #[serde(default)]
    pub files: Vec<AttachedFile>,
}

/// One prior turn of the conversation as the client recorded it.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// A client-side uploaded file, reduced to its extracted text.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachedFile {
    #[serde(default)]
    pub text: String,
}

/// Inbound image generation request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImageRequest {
    #[serde(default)]
    #[validate(custom(function = "prompt_present"))]
    pub prompt: String,
    #[serde(default = "default_image_size")]
    pub size: String,
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn prompt_present(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        let mut err = ValidationError::new("prompt");
        err.message = Some("Missing prompt".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub url: String,
}
