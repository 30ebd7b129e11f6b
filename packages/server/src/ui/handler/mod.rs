//! Request handlers.

mod http;
mod websocket;

pub use http::{connect_room, create_room, get_room, health_check, list_rooms};
pub use websocket::websocket_handler;
