//! UseCase: ルーム取得

use std::sync::Arc;

use crate::domain::{RoomId, RoomInfo, RoomRepository};

use super::error::GetRoomError;

/// ルーム取得のユースケース
///
/// `GET /api/rooms/{room_id}` と `PUT /api/rooms/connect`（参加前の確認）で使う。
pub struct GetRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 文字列の ID でルームを取得
    pub async fn execute(&self, raw_id: &str) -> Result<RoomInfo, GetRoomError> {
        let id: RoomId = raw_id.parse()?;
        let room = self.repository.get_room(id).await?;
        Ok(room)
    }
}
