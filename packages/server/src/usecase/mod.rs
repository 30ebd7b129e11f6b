//! UseCase 層
//!
//! HTTP / WebSocket ハンドラから呼ばれるアプリケーションロジック。
//! 入力のバリデーションを行い、RoomRepository trait を通じてルームを操作します。

mod create_room;
mod error;
mod get_room;
mod join_room;
mod list_public_rooms;

pub use create_room::CreateRoomUseCase;
pub use error::{CreateRoomError, GetRoomError, JoinRoomError};
pub use get_room::GetRoomUseCase;
pub use join_room::JoinRoomUseCase;
pub use list_public_rooms::ListPublicRoomsUseCase;
