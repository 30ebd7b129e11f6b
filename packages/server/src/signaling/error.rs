//! Error types for the signaling core.

use std::time::Duration;

use thiserror::Error;

use super::message::MessageKind;

/// Errors returned by a [`Client`](super::Client).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The connection has been torn down
    #[error("client is closed")]
    Closed,
}

/// The engine has reported itself empty and takes no more connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("peer connection {0} is retired")]
pub struct EngineRetired(pub u64);

/// Errors that abort a relay sequence.
#[derive(Debug, Error)]
pub enum SignalingError {
    /// Sending to or receiving from a peer failed
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// A peer answered with a kind other than the awaited one
    #[error("received unexpected message type '{received}' instead of '{expected}'")]
    UnexpectedMessageKind {
        expected: MessageKind,
        received: MessageKind,
    },

    /// A peer sent a payload that is not a signaling message
    #[error("received illegal message: {source}")]
    IllegalMessage {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// A peer did not answer within the configured relay timeout
    #[error("timed out after {timeout:?} waiting for '{expected}'")]
    RelayTimeout {
        expected: MessageKind,
        timeout: Duration,
    },
}
