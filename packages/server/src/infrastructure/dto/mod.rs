//! Data Transfer Objects (DTOs) for the HTTP API.
//!
//! Signaling messages on the WebSocket have their own wire type in
//! `crate::signaling`.

pub mod conversion;
pub mod http;
