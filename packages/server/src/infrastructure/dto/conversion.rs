//! Conversion logic between DTOs and domain entities.

use duet_shared::time::timestamp_to_rfc3339;

use crate::domain::{RoomId, RoomInfo};
use crate::infrastructure::dto::http as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<RoomInfo> for dto::RoomSummaryDto {
    fn from(model: RoomInfo) -> Self {
        Self {
            id: model.id.value(),
            name: model.name.into_string(),
            connections: model.connections,
            access: model.access.value(),
            created_at: timestamp_to_rfc3339(model.created_at.value()),
        }
    }
}

impl From<RoomId> for dto::RoomCreatedDto {
    fn from(id: RoomId) -> Self {
        Self { id: id.value() }
    }
}
