//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::IdentityResolver;
use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetHistoryUseCase, SendMessageUseCase,
};

use super::handler::http::{get_messages, health_check};
use super::handler::websocket::websocket_handler;
use super::signal::shutdown_signal;
use super::state::AppState;

/// The chat server: owns the application state and the route table.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        connect_session: Arc<ConnectSessionUseCase>,
        disconnect_session: Arc<DisconnectSessionUseCase>,
        send_message: Arc<SendMessageUseCase>,
        get_history: Arc<GetHistoryUseCase>,
        resolver: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_session,
                disconnect_session,
                send_message,
                get_history,
                resolver,
            }),
        }
    }

    /// Build the route table. Exposed separately so tests can serve the
    /// router on an ephemeral port.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/messages", get(get_messages))
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind and serve until a shutdown signal arrives.
    pub async fn run(&self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
