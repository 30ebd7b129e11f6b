//! 値オブジェクト
//!
//! 生成時にバリデーションを行い、以降は不変。

use std::{fmt, str::FromStr};

use super::error::ValidationError;

const ROOM_NAME_MIN_CHARS: usize = 3;
const ROOM_NAME_MAX_CHARS: usize = 50;

/// ルーム ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(u64);

impl RoomId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = ValidationError;

    /// パスやフォームの文字列からルーム ID を読み取る
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::new("id", "must be an integer"))
    }
}

/// ルーム名（前後の空白を除いて 3〜50 文字）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("name", "must not be blank"));
        }
        let chars = trimmed.chars().count();
        if !(ROOM_NAME_MIN_CHARS..=ROOM_NAME_MAX_CHARS).contains(&chars) {
            return Err(ValidationError::new(
                "name",
                format!(
                    "must be between {} and {} characters",
                    ROOM_NAME_MIN_CHARS, ROOM_NAME_MAX_CHARS
                ),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルームの公開範囲（フォーム上は 0 = private, 1 = public）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomAccess {
    Private,
    Public,
}

impl RoomAccess {
    pub fn value(&self) -> u8 {
        match self {
            RoomAccess::Private => 0,
            RoomAccess::Public => 1,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, RoomAccess::Public)
    }
}

impl TryFrom<i64> for RoomAccess {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RoomAccess::Private),
            1 => Ok(RoomAccess::Public),
            _ => Err(ValidationError::new("access", "must be 0 or 1")),
        }
    }
}

/// UTC ミリ秒のタイムスタンプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
