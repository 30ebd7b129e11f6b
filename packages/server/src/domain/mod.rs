//! ドメイン層
//!
//! ルームの値オブジェクト・スナップショット・エラー、および
//! Infrastructure 層が実装する Repository trait を定義します。

pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use entity::RoomInfo;
pub use error::{RepositoryError, ValidationError};
pub use repository::RoomRepository;
#[cfg(test)]
pub use repository::MockRoomRepository;
pub use value_object::{RoomAccess, RoomId, RoomName, Timestamp};
