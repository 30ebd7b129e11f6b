//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, RoomId, ValidationError};

/// ルーム作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    #[error("room named '{0}' already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CreateRoomError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomAlreadyExists(name) => CreateRoomError::AlreadyExists(name),
            other => CreateRoomError::Repository(other),
        }
    }
}

/// ルーム取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    #[error("room {0} does not exist")]
    NotFound(RoomId),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for GetRoomError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomDoesNotExist(id) => GetRoomError::NotFound(id),
            other => GetRoomError::Repository(other),
        }
    }
}

/// ルーム参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// WebSocket のパスに整数でないルーム ID が指定された
    #[error(transparent)]
    InvalidRoomId(#[from] ValidationError),

    #[error("room {0} does not exist")]
    NotFound(RoomId),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for JoinRoomError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomDoesNotExist(id) => JoinRoomError::NotFound(id),
            other => JoinRoomError::Repository(other),
        }
    }
}
