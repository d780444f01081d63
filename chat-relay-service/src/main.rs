use chat_relay_service::config::RelayConfig;
use chat_relay_service::observability::init_tracing;
use chat_relay_service::startup::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing; span export is enabled only when a collector
    // endpoint is configured.
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("chat-relay-service", "info", otlp_endpoint.as_deref());

    let config = RelayConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tracing::info!("Relay listening on port {}", app.port());

    app.run_until_stopped().await
}
