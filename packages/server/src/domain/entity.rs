//! ドメインエンティティ

use super::value_object::{RoomAccess, RoomId, RoomName, Timestamp};

/// ルームのある時点のスナップショット
///
/// `connections` は取得時点でルームに接続しているクライアント数
/// （シグナリング中の 2 人と待機中のクライアントを含む）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub id: RoomId,
    pub name: RoomName,
    pub connections: usize,
    pub access: RoomAccess,
    pub created_at: Timestamp,
}
