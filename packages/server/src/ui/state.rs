//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::RoomRepository,
    usecase::{CreateRoomUseCase, GetRoomUseCase, JoinRoomUseCase, ListPublicRoomsUseCase},
};

/// Shared application state
pub struct AppState {
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomUseCase（ルーム取得のユースケース）
    pub get_room_usecase: Arc<GetRoomUseCase>,
    /// ListPublicRoomsUseCase（公開ルーム一覧のユースケース）
    pub list_public_rooms_usecase: Arc<ListPublicRoomsUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
}

impl AppState {
    /// Build every use case on top of one repository.
    pub fn from_repository(repository: Arc<dyn RoomRepository>) -> Self {
        Self {
            create_room_usecase: Arc::new(CreateRoomUseCase::new(repository.clone())),
            get_room_usecase: Arc::new(GetRoomUseCase::new(repository.clone())),
            list_public_rooms_usecase: Arc::new(ListPublicRoomsUseCase::new(repository.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(repository)),
        }
    }
}
