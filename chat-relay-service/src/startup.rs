//! Application startup and lifecycle management.

use crate::config::RelayConfig;
use crate::error::AppError;
use crate::services::providers::openai::{OpenAiConfig, OpenAiProvider};
use crate::services::providers::{ChatProvider, ImageProvider};
use crate::{build_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        let provider = Arc::new(OpenAiProvider::new(OpenAiConfig {
            api_key: config.openai.api_key.clone(),
            base_url: config.openai.base_url.clone(),
            text_model: config.openai.text_model.clone(),
            image_model: config.openai.image_model.clone(),
        }));

        tracing::info!(
            text_model = %config.openai.text_model,
            image_model = %config.openai.image_model,
            "Initialized OpenAI provider"
        );

        let state = AppState {
            config: config.clone(),
            chat_provider: provider.clone() as Arc<dyn ChatProvider>,
            image_provider: provider as Arc<dyn ImageProvider>,
        };

        // Bind the listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
