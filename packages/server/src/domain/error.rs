//! ドメイン層のエラー型

use thiserror::Error;

use super::value_object::RoomId;

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room {0} does not exist")]
    RoomDoesNotExist(RoomId),

    #[error("room named '{0}' already exists")]
    RoomAlreadyExists(String),
}

/// 値オブジェクト生成時のバリデーションエラー
///
/// `Display` は `"<field> <reason>"` の形（例: `name must not be blank`）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
