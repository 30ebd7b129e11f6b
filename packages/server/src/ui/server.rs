//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{connect_room, create_room, get_room, health_check, list_rooms, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws/room/{room_id}", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(list_rooms).post(create_room))
        .route("/api/rooms/connect", put(connect_room))
        .route("/api/rooms/{room_id}", get(get_room))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// WebRTC signaling server
///
/// # Example
///
/// ```ignore
/// let state = AppState::from_repository(repository);
/// Server::new(state).run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(self.state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Signaling server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/room/{{room_id}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
