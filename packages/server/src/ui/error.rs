//! Mapping from use case errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    infrastructure::dto::http::ErrorDto,
    usecase::{CreateRoomError, GetRoomError, JoinRoomError},
};

/// Error returned by the HTTP handlers, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    CreateRoom(#[from] CreateRoomError),

    #[error(transparent)]
    GetRoom(#[from] GetRoomError),

    #[error(transparent)]
    JoinRoom(#[from] JoinRoomError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::CreateRoom(CreateRoomError::InvalidInput(_))
            | ApiError::GetRoom(GetRoomError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::CreateRoom(CreateRoomError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::GetRoom(GetRoomError::NotFound(_))
            | ApiError::JoinRoom(JoinRoomError::NotFound(_)) => StatusCode::NOT_FOUND,
            // a malformed id on the WebSocket path is a server-side routing failure
            ApiError::JoinRoom(JoinRoomError::InvalidRoomId(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::CreateRoom(CreateRoomError::Repository(_))
            | ApiError::GetRoom(GetRoomError::Repository(_))
            | ApiError::JoinRoom(JoinRoomError::Repository(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status, self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, self);
        }
        let body = ErrorDto {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
