//! HTTP / WebSocket server (axum).

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ApiError;
pub use server::{Server, router};
pub use state::AppState;
