//! Repository trait 定義
//!
//! ドメイン層が必要とするルームレジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use crate::signaling::Client;

use super::{RepositoryError, RoomAccess, RoomId, RoomInfo, RoomName};

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを作成し、採番した ID を返す
    ///
    /// 同名のルームが存在する場合は `RoomAlreadyExists`。
    async fn create_room(
        &self,
        name: RoomName,
        access: RoomAccess,
    ) -> Result<RoomId, RepositoryError>;

    /// ルームのスナップショットを取得
    async fn get_room(&self, id: RoomId) -> Result<RoomInfo, RepositoryError>;

    /// 公開ルームを作成日時の新しい順に取得
    ///
    /// 接続が 0 件のルームは取得前に削除される。
    async fn list_public_rooms(&self) -> Vec<RoomInfo>;

    /// クライアントをルームのシグナリングに参加させる
    ///
    /// 参加によって始まった中継が終わるまで戻らない。
    async fn add_connection(&self, id: RoomId, client: Client) -> Result<(), RepositoryError>;
}
