//! SyncCinema watch-together server.
//!
//! Keeps viewers' playback in sync over WebSocket and relays media bytes from
//! the upstream origin so that its URL and API key never reach the browser.
//!
//! Run with:
//! ```not_rust
//! JELLYFIN_SERVER_URL=http://localhost:8096 JELLYFIN_API_KEY=... \
//! JELLYFIN_USER_ID=... JWT_SECRET=... cargo run --bin synccinema-server
//! cargo run --bin synccinema-server -- --host 0.0.0.0 --port 3001
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use synccinema_server::{
    config::{AuthConfig, ConfigError, OriginConfig, ServerConfig, normalize_base_url},
    infrastructure::{
        credential::JwtCredentialVerifier, message_pusher::WebSocketMessagePusher,
        origin::JellyfinOrigin, repository::InMemoryRoomRepository,
    },
    ui::Server,
    usecase::{
        BrowseCatalogUseCase, ConnectParticipantUseCase, ControlPlaybackUseCase,
        DisconnectParticipantUseCase, JoinRoomUseCase, RelayStreamUseCase, SendMessageUseCase,
    },
};
use synccinema_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "synccinema-server")]
#[command(about = "Watch-together server with synchronized playback and a media relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Externally visible base URL used in relay URLs handed to clients
    #[arg(long, env = "PUBLIC_BASE_URL")]
    public_base_url: Option<String>,

    /// Base URL of the media origin
    #[arg(long, env = "JELLYFIN_SERVER_URL")]
    origin_url: String,

    /// API key for the media origin
    #[arg(long, env = "JELLYFIN_API_KEY", hide_env_values = true)]
    origin_api_key: String,

    /// User whose library is browsed and streamed
    #[arg(long, env = "JELLYFIN_USER_ID")]
    origin_user_id: String,

    /// Shared secret for verifying identity tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Seconds allowed for connecting to the origin
    #[arg(long, env = "ORIGIN_CONNECT_TIMEOUT_SECS", default_value = "10")]
    connect_timeout_secs: u64,

    /// Seconds allowed for the origin to send response headers
    #[arg(long, env = "ORIGIN_RESPONSE_TIMEOUT_SECS", default_value = "30")]
    response_timeout_secs: u64,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let public_base_url = self
            .public_base_url
            .filter(|url| !url.is_empty())
            .map(|url| normalize_base_url("public base URL", &url))
            .transpose()?;
        let origin = OriginConfig::new(&self.origin_url, &self.origin_api_key, &self.origin_user_id)?
            .with_timeouts(
                Duration::from_secs(self.connect_timeout_secs),
                Duration::from_secs(self.response_timeout_secs),
            );
        let auth = AuthConfig::new(&self.jwt_secret)?;

        Ok(ServerConfig {
            host: self.host,
            port: self.port,
            public_base_url,
            origin,
            auth,
        })
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("synccinema_server", env!("CARGO_BIN_NAME"), "debug");

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Loaded configuration: {:?}", config);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Credential verifier and media origin
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create outbound adapters
    let verifier = Arc::new(JwtCredentialVerifier::new(config.auth.jwt_secret()));
    let origin = match JellyfinOrigin::new(config.origin.clone()) {
        Ok(origin) => Arc::new(origin),
        Err(e) => {
            tracing::error!("Failed to build origin client: {}", e);
            std::process::exit(1);
        }
    };
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        verifier,
        message_pusher.clone(),
    ));
    let disconnect_participant_usecase =
        Arc::new(DisconnectParticipantUseCase::new(message_pusher.clone()));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let control_playback_usecase = Arc::new(ControlPlaybackUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock,
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(message_pusher.clone()));
    let relay_stream_usecase = Arc::new(RelayStreamUseCase::new(
        origin.clone(),
        config.public_base_url.clone(),
    ));
    let browse_catalog_usecase = Arc::new(BrowseCatalogUseCase::new(origin));

    // 5. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        disconnect_participant_usecase,
        join_room_usecase,
        control_playback_usecase,
        send_message_usecase,
        relay_stream_usecase,
        browse_catalog_usecase,
    );
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
