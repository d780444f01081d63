use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::services::providers::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Use POST")]
    MethodNotAllowed,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        raw: Value,
    },

    #[error("{message}")]
    NoResult { message: String, raw: Value },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(msg) => AppError::Config(msg),
            ProviderError::Upstream {
                status,
                message,
                raw,
            } => AppError::Upstream {
                status,
                message,
                raw,
            },
            ProviderError::EmptyResponse { message, raw } => AppError::NoResult { message, raw },
            ProviderError::Api(msg) | ProviderError::Network(msg) => {
                AppError::Internal(anyhow::anyhow!(msg))
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            raw: Option<Value>,
        }

        let (status, error, raw) = match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Use POST".to_string(),
                None,
            ),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                first_validation_message(&errors),
                None,
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            AppError::Upstream {
                status,
                message,
                raw,
            } => (
                // The upstream status is passed through verbatim.
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
                Some(raw),
            ),
            AppError::NoResult { message, raw } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, Some(raw))
            }
            AppError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = %error, "Request failed");
        }

        (status, Json(ErrorBody { error, raw })).into_response()
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
