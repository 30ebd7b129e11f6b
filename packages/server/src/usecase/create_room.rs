//! UseCase: ルーム作成
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - フォーム入力のバリデーションと Repository への委譲
//!
//! ### なぜこのテストが必要か
//! - 不正な入力が Repository に届かないことを保証する
//! - 同名ルームのエラーが HTTP 409 に対応する種類で返ることを確認する

use std::sync::Arc;

use crate::domain::{RoomAccess, RoomId, RoomName, RoomRepository, ValidationError};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム作成を実行
    ///
    /// # Arguments
    ///
    /// * `name` - ルーム名（フォームの生の値）
    /// * `access` - 公開範囲（`"0"` = private, `"1"` = public）
    ///
    /// # Returns
    ///
    /// * `Ok(RoomId)` - 作成されたルームの ID
    /// * `Err(CreateRoomError)` - バリデーションエラーまたは同名ルームの存在
    pub async fn execute(&self, name: String, access: &str) -> Result<RoomId, CreateRoomError> {
        let name = RoomName::new(name)?;
        let access = parse_access(access)?;

        let id = self.repository.create_room(name, access).await?;
        Ok(id)
    }
}

fn parse_access(raw: &str) -> Result<RoomAccess, ValidationError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::new("access", "must be 0 or 1"))?;
    RoomAccess::try_from(value)
}
