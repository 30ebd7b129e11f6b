//! UseCase: 公開ルーム一覧

use std::sync::Arc;

use crate::domain::{RoomInfo, RoomRepository};

/// 公開ルーム一覧取得のユースケース
pub struct ListPublicRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl ListPublicRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 接続中のクライアントがいる公開ルームを新しい順に返す
    pub async fn execute(&self) -> Vec<RoomInfo> {
        self.repository.list_public_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockRoomRepository, RoomAccess, RoomId, RoomName, Timestamp};

    #[tokio::test]
    async fn test_list_public_rooms_delegates_to_repository() {
        // テスト項目: Repository の一覧がそのまま返る
        // given (前提条件):
        let room = RoomInfo {
            id: RoomId::new(1),
            name: RoomName::new("lobby".to_string()).unwrap(),
            connections: 1,
            access: RoomAccess::Public,
            created_at: Timestamp::new(1000),
        };
        let expected = vec![room.clone()];
        let mut repository = MockRoomRepository::new();
        repository
            .expect_list_public_rooms()
            .times(1)
            .returning(move || vec![room.clone()]);
        let usecase = ListPublicRoomsUseCase::new(Arc::new(repository));

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms, expected);
    }
}
