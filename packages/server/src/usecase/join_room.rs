//! UseCase: ルーム参加（WebSocket 接続）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::check() によるアップグレード前の確認
//! - JoinRoomUseCase::execute() による Repository への委譲
//!
//! ### どのような状況を想定しているか
//! - 正常系：存在するルームへの参加
//! - 異常系：整数でない ID、存在しないルーム、確認後に削除されたルーム

use std::sync::Arc;

use crate::{
    domain::{RoomId, RoomRepository},
    signaling::Client,
};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// WebSocket へのアップグレード前にルームの存在を確認する
    pub async fn check(&self, raw_id: &str) -> Result<RoomId, JoinRoomError> {
        let id: RoomId = raw_id.parse()?;
        self.repository.get_room(id).await?;
        Ok(id)
    }

    /// クライアントをルームのシグナリングに参加させる
    ///
    /// 参加によって始まった中継が終わるまで戻らない。
    pub async fn execute(&self, id: RoomId, client: Client) -> Result<(), JoinRoomError> {
        tracing::info!("Client {} joining room {}", client.id(), id);
        self.repository.add_connection(id, client).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MockRoomRepository, RepositoryError, RoomAccess, RoomInfo, RoomName, Timestamp,
        },
        signaling::testing::test_client,
    };

    #[tokio::test]
    async fn test_check_existing_room() {
        // テスト項目: 存在するルームの ID が返る
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        repository.expect_get_room().returning(|id| {
            Ok(RoomInfo {
                id,
                name: RoomName::new("lobby".to_string()).unwrap(),
                connections: 0,
                access: RoomAccess::Public,
                created_at: Timestamp::new(0),
            })
        });
        let usecase = JoinRoomUseCase::new(Arc::new(repository));

        // when (操作):
        let result = usecase.check("42").await;

        // then (期待する結果):
        assert_eq!(result, Ok(RoomId::new(42)));
    }

    #[tokio::test]
    async fn test_check_rejects_non_integer_id() {
        // テスト項目: 整数でない ID は InvalidRoomId になる
        let mut repository = MockRoomRepository::new();
        repository.expect_get_room().never();
        let usecase = JoinRoomUseCase::new(Arc::new(repository));

        let result = usecase.check("abc").await;

        assert!(matches!(result, Err(JoinRoomError::InvalidRoomId(_))));
    }

    #[tokio::test]
    async fn test_check_missing_room() {
        // テスト項目: 存在しないルームは NotFound になる
        let mut repository = MockRoomRepository::new();
        repository
            .expect_get_room()
            .returning(|id| Err(RepositoryError::RoomDoesNotExist(id)));
        let usecase = JoinRoomUseCase::new(Arc::new(repository));

        let result = usecase.check("9").await;

        assert_eq!(result, Err(JoinRoomError::NotFound(RoomId::new(9))));
    }

    #[tokio::test]
    async fn test_execute_adds_connection() {
        // テスト項目: クライアントが指定したルームに追加される
        // given (前提条件):
        let (client, _peer) = test_client();
        let expected = client.id();
        let mut repository = MockRoomRepository::new();
        repository
            .expect_add_connection()
            .withf(move |id, client| *id == RoomId::new(42) && client.id() == expected)
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = JoinRoomUseCase::new(Arc::new(repository));

        // when (操作):
        let result = usecase.execute(RoomId::new(42), client).await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_execute_room_removed_after_check() {
        // テスト項目: 確認後にルームが削除されていれば NotFound になる
        // given (前提条件):
        let (client, _peer) = test_client();
        let mut repository = MockRoomRepository::new();
        repository
            .expect_add_connection()
            .returning(|id, _| Err(RepositoryError::RoomDoesNotExist(id)));
        let usecase = JoinRoomUseCase::new(Arc::new(repository));

        // when (操作):
        let result = usecase.execute(RoomId::new(42), client).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::NotFound(RoomId::new(42))));
    }
}
