//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Form body of `POST /api/rooms`
///
/// Fields stay raw strings so that malformed values become validation errors
/// (400) instead of extractor rejections.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub access: String,
}

/// Form body of `PUT /api/rooms/connect`
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectRoomForm {
    #[serde(default)]
    pub id: String,
}

/// Response of `POST /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomCreatedDto {
    pub id: u64,
}

/// Room summary returned by the room endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: u64,
    pub name: String,
    pub connections: usize,
    /// 0 = private, 1 = public
    pub access: u8,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
