//! Signaling core: connection pumps, join-ordered registry and the pairing engine.

mod client;
mod client_list;
mod error;
mod message;
mod peer;
mod peer_connection;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Client, ConnectionId, QUEUE_CAPACITY};
pub use client_list::ClientList;
pub use error::{ConnectionError, EngineRetired, SignalingError};
pub use message::{MessageKind, SignalMessage};
pub use peer_connection::{PeerConnection, SignalingConfig};
