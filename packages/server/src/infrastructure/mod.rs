//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod credential;
pub mod dto;
pub mod message_pusher;
pub mod origin;
pub mod repository;
