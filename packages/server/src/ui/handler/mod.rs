//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{get_stream_url, health_check, list_episodes, list_movies, stream_video};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
