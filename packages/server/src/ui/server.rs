//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    BrowseCatalogUseCase, ConnectParticipantUseCase, ControlPlaybackUseCase,
    DisconnectParticipantUseCase, JoinRoomUseCase, RelayStreamUseCase, SendMessageUseCase,
};

use super::{
    handler::{
        get_stream_url, health_check, list_episodes, list_movies, stream_video, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Watch-together server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     join_room_usecase,
///     control_playback_usecase,
///     send_message_usecase,
///     relay_stream_usecase,
///     browse_catalog_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 3001).await?;
/// ```
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_participant_usecase` - UseCase for the WebSocket handshake
    /// * `disconnect_participant_usecase` - UseCase for connection teardown
    /// * `join_room_usecase` - UseCase for `join_room`
    /// * `control_playback_usecase` - UseCase for `play` / `pause` / `seek`
    /// * `send_message_usecase` - UseCase for `send_message`
    /// * `relay_stream_usecase` - UseCase for the media relay endpoints
    /// * `browse_catalog_usecase` - UseCase for the library endpoints
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        control_playback_usecase: Arc<ControlPlaybackUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        relay_stream_usecase: Arc<RelayStreamUseCase>,
        browse_catalog_usecase: Arc<BrowseCatalogUseCase>,
    ) -> Self {
        Self {
            state: AppState {
                connect_participant_usecase,
                disconnect_participant_usecase,
                join_room_usecase,
                control_playback_usecase,
                send_message_usecase,
                relay_stream_usecase,
                browse_catalog_usecase,
            },
        }
    }

    /// Build the router with every endpoint mounted
    pub fn router(self) -> Router {
        let app_state = Arc::new(self.state);

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/relay/items/{item_id}", get(get_stream_url))
            .route("/relay/items/{item_id}/video", get(stream_video))
            .route("/relay/movies", get(list_movies))
            .route("/relay/episodes/{series_id}", get(list_episodes))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3001)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Watch-together server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
