//! Watch-together server: WebSocket gateway and HTTP relay endpoints.

mod handler;
mod server;
mod signal;
pub mod state; // UseCase 層からアクセスするため public に変更

pub use server::Server;
pub use state::AppState;
