//! Integration tests for the /chat relay endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chat_relay_service::config::{CommonConfig, OpenAiSettings, RelayConfig};
use chat_relay_service::services::providers::mock::{MockChatProvider, MockImageProvider};
use chat_relay_service::services::providers::openai::{OpenAiConfig, OpenAiProvider};
use chat_relay_service::services::providers::ProviderError;
use chat_relay_service::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_config(api_key: &str) -> RelayConfig {
    RelayConfig {
        common: CommonConfig { port: 0 },
        openai: OpenAiSettings {
            api_key: api_key.to_string(),
            base_url: "http://localhost:9".to_string(),
            text_model: "gpt-4.1-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
        },
    }
}

fn app_with_chat(provider: MockChatProvider) -> Router {
    let state = AppState {
        config: test_config("test-api-key"),
        chat_provider: Arc::new(provider),
        image_provider: Arc::new(MockImageProvider::returning("http://unused/img.png")),
    };
    build_router(state)
}

/// App wired to the real OpenAI provider with an empty credential; the key
/// check fires before any network call, so no upstream is needed.
fn app_without_credential() -> Router {
    let config = test_config("");
    let provider = Arc::new(OpenAiProvider::new(OpenAiConfig {
        api_key: config.openai.api_key.clone(),
        base_url: config.openai.base_url.clone(),
        text_model: config.openai.text_model.clone(),
        image_model: config.openai.image_model.clone(),
    }));
    let state = AppState {
        config,
        chat_provider: provider.clone(),
        image_provider: provider,
    };
    build_router(state)
}

fn post_chat(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&body).expect("Failed to parse response body")
}

#[tokio::test]
async fn chat_returns_the_model_reply() {
    let app = app_with_chat(MockChatProvider::replying("Hello"));

    let response = app
        .oneshot(post_chat(json!({"message": "Hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["reply"], "Hello");
}

#[tokio::test]
async fn chat_tolerates_an_empty_body() {
    let app = app_with_chat(MockChatProvider::replying("Hello"));

    let response = app.oneshot(post_chat(json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_passes_through_the_upstream_error() {
    let raw = json!({"error": {"message": "rate limited", "type": "rate_limit_error"}});
    let app = app_with_chat(MockChatProvider::failing(ProviderError::Upstream {
        status: 429,
        message: "rate limited".to_string(),
        raw: raw.clone(),
    }));

    let response = app
        .oneshot(post_chat(json!({"message": "Hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = read_json(response).await;
    assert_eq!(body["error"], "rate limited");
    assert_eq!(body["raw"], raw);
}

#[tokio::test]
async fn chat_reports_an_empty_upstream_reply() {
    let raw = json!({"output": []});
    let app = app_with_chat(MockChatProvider::failing(ProviderError::EmptyResponse {
        message: "No reply returned by model".to_string(),
        raw: raw.clone(),
    }));

    let response = app
        .oneshot(post_chat(json!({"message": "Hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"], "No reply returned by model");
    assert_eq!(body["raw"], raw);
}

#[tokio::test]
async fn chat_reports_the_missing_credential() {
    let app = app_without_credential();

    let response = app
        .oneshot(post_chat(json!({"message": "Hi"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Missing OPENAI_API_KEY");
}

#[tokio::test]
async fn chat_rejects_non_post_methods() {
    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let app = app_with_chat(MockChatProvider::replying("Hello"));
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/chat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = read_json(response).await;
        assert_eq!(body["error"], "Use POST");
    }
}

#[tokio::test]
async fn chat_preflight_gets_permissive_cors_headers() {
    let app = app_with_chat(MockChatProvider::replying("Hello"));

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/chat")
                .header("Origin", "http://example.com")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let allow_methods = response.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(allow_methods.contains("POST"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn chat_rejects_a_malformed_json_body() {
    let app = app_with_chat(MockChatProvider::replying("Hello"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Json parse error"));
}
