//! SyncCinema watch-together server library.
//!
//! Keeps the playback state of every viewing room in lockstep across
//! WebSocket connections, and relays range requests for media bytes to the
//! upstream origin so its credentials stay on the server.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
