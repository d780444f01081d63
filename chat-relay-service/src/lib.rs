pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod services;
pub mod startup;
pub mod utils;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::services::providers::{ChatProvider, ImageProvider};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub chat_provider: Arc<dyn ChatProvider>,
    pub image_provider: Arc<dyn ImageProvider>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/chat",
            post(handlers::chat).fallback(handlers::method_not_allowed),
        )
        .route(
            "/media",
            post(handlers::generate_image).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
}

/// Service health check
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.chat_provider.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "chat-relay-service",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": "chat-relay-service",
                "error": e.to_string()
            })),
        ),
    }
}
