//! Shared utilities for SyncCinema binaries and tests.

pub mod logger;
pub mod time;
