//! Data Transfer Objects (DTOs) for the watch-together server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event envelopes
//! - `http`: HTTP API response DTOs
//! - `origin`: payloads returned by the upstream media origin

pub mod conversion;
pub mod http;
pub mod origin;
pub mod websocket;
