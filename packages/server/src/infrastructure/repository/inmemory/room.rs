//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用し、ルームごとにシグナリングエンジン
//! （`PeerConnection`）を 1 つ保持します。
//!
//! ## ロック
//!
//! テーブルは `std::sync::RwLock` で保護し、`.await` を跨いで保持しない。
//! 特に中継中はロックを解放しているため、あるルームの中継が他のルームの
//! 作成・取得・一覧を止めることはない。
//!
//! そのため参加処理はテーブルから取り出したエンジンに後から接続する。
//! 削除されるルームのエンジンは必ず退役させ、退役済みエンジンへの参加は
//! `RoomDoesNotExist` として扱う。

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak},
};

use async_trait::async_trait;
use duet_shared::time::Clock;
use rand::Rng;

use crate::{
    domain::{
        RepositoryError, RoomAccess, RoomId, RoomInfo, RoomName, RoomRepository, Timestamp,
    },
    signaling::{Client, PeerConnection, SignalingConfig},
};

/// ルーム ID の採番範囲（上限は含まない）
const ROOM_ID_RANGE: std::ops::Range<u64> = 1..1_000_000;

struct Room {
    name: RoomName,
    access: RoomAccess,
    created_at: Timestamp,
    connection: Arc<PeerConnection>,
}

impl Room {
    fn info(&self, id: RoomId) -> RoomInfo {
        RoomInfo {
            id,
            name: self.name.clone(),
            connections: self.connection.connection_count(),
            access: self.access,
            created_at: self.created_at,
        }
    }
}

type RoomTable = HashMap<RoomId, Room>;

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: Arc<RwLock<RoomTable>>,
    clock: Arc<dyn Clock>,
    config: SignalingConfig,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    ///
    /// `config` は作成される全ルームのシグナリングエンジンに渡される。
    pub fn new(clock: Arc<dyn Clock>, config: SignalingConfig) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            clock,
            config,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RoomTable> {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RoomTable> {
        self.rooms.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_room(&self, name: RoomName, access: RoomAccess) -> Result<RoomId, RepositoryError> {
        let mut rooms = self.write();

        if rooms.values().any(|room| room.name == name) {
            return Err(RepositoryError::RoomAlreadyExists(name.into_string()));
        }

        let mut rng = rand::rng();
        let id = loop {
            let candidate = RoomId::new(rng.random_range(ROOM_ID_RANGE));
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let engine = PeerConnection::new(self.config);
        let engine_id = engine.id();
        let table = Arc::downgrade(&self.rooms);
        let engine = engine.with_on_empty(move || evict_emptied(&table, id, engine_id));

        rooms.insert(
            id,
            Room {
                name,
                access,
                created_at: Timestamp::new(self.clock.now_millis()),
                connection: Arc::new(engine),
            },
        );
        tracing::info!(
            "Room {} created (engine {}, {} rooms)",
            id,
            engine_id,
            rooms.len()
        );

        Ok(id)
    }

    fn find_engine(&self, id: RoomId) -> Option<Arc<PeerConnection>> {
        self.read().get(&id).map(|room| room.connection.clone())
    }
}

/// エンジンが空になったルームを削除する
///
/// 同じ ID に別のエンジンが入っている場合（削除済みの ID が再採番された場合）は何もしない。
fn evict_emptied(table: &Weak<RwLock<RoomTable>>, id: RoomId, engine_id: u64) {
    let Some(table) = table.upgrade() else {
        return;
    };
    let mut rooms = table.write().unwrap_or_else(PoisonError::into_inner);
    if rooms
        .get(&id)
        .is_some_and(|room| room.connection.id() == engine_id)
    {
        rooms.remove(&id);
        tracing::info!("Room {} removed: last connection left", id);
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        name: RoomName,
        access: RoomAccess,
    ) -> Result<RoomId, RepositoryError> {
        self.insert_room(name, access)
    }

    async fn get_room(&self, id: RoomId) -> Result<RoomInfo, RepositoryError> {
        self.read()
            .get(&id)
            .map(|room| room.info(id))
            .ok_or(RepositoryError::RoomDoesNotExist(id))
    }

    async fn list_public_rooms(&self) -> Vec<RoomInfo> {
        let mut public = {
            let mut rooms = self.write();
            rooms.retain(|id, room| {
                let alive = !room.connection.retire_if_idle();
                if !alive {
                    tracing::info!("Room {} removed: no connections", id);
                }
                alive
            });
            rooms
                .iter()
                .filter(|(_, room)| room.access.is_public())
                .map(|(id, room)| room.info(*id))
                .collect::<Vec<_>>()
        };

        public.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        public
    }

    async fn add_connection(&self, id: RoomId, client: Client) -> Result<(), RepositoryError> {
        let engine = self
            .find_engine(id)
            .ok_or(RepositoryError::RoomDoesNotExist(id))?;

        tracing::debug!(
            "Client {} joining room {} (engine {})",
            client.id(),
            id,
            engine.id()
        );
        engine
            .add_connection(client)
            .await
            .map_err(|_| RepositoryError::RoomDoesNotExist(id))
    }
}
