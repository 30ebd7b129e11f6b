//! Wire messages exchanged with browser peers during signaling.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SignalingError;

/// Kind of a signaling message (the `type` field on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    RequestOffer,
    Offer,
    Answer,
    Wait,
    /// Keep-alive sent by a peer that is still preparing its description.
    Hold,
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::RequestOffer => "request-offer",
            MessageKind::Offer => "offer",
            MessageKind::Answer => "answer",
            MessageKind::Wait => "wait",
            MessageKind::Hold => "hold",
            MessageKind::Error => "error",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single signaling message.
///
/// `offer`/`answer` carry `sdp`, `wait`/`error` carry `data`. Absent fields are
/// omitted on encode and unknown fields are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<String>,
}

impl SignalMessage {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            data: None,
            sdp: None,
        }
    }

    pub fn with_data(kind: MessageKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: Some(data.into()),
            sdp: None,
        }
    }

    pub fn with_sdp(kind: MessageKind, sdp: impl Into<String>) -> Self {
        Self {
            kind,
            data: None,
            sdp: Some(sdp.into()),
        }
    }

    /// Asks the sender of a fresh pair to produce an offer.
    pub fn request_offer() -> Self {
        Self::new(MessageKind::RequestOffer)
    }

    /// Sent to a lone connection.
    pub fn wait_for_peer() -> Self {
        Self::with_data(MessageKind::Wait, "Wait for peer")
    }

    /// Sent to a connection joining a room whose pair is already active.
    pub fn wait_for_room() -> Self {
        Self::with_data(MessageKind::Wait, "Wait for room")
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::with_data(MessageKind::Error, reason)
    }

    pub fn encode(&self) -> String {
        // A struct of strings and a unit enum always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn decode(raw: &str) -> Result<Self, SignalingError> {
        serde_json::from_str(raw).map_err(|source| SignalingError::IllegalMessage {
            raw: raw.to_string(),
            source,
        })
    }
}
