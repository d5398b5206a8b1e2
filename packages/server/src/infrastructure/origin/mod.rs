//! Upstream media origin clients.
//!
//! - `jellyfin`: Jellyfin / Emby compatible HTTP API

pub mod jellyfin;

pub use jellyfin::JellyfinOrigin;
