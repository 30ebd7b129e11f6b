//! WebRTC signaling relay library.
//!
//! Two browser peers meet in a named room, exchange an SDP offer/answer pair over
//! a WebSocket connection and then talk to each other directly.

// core
pub mod signaling;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
