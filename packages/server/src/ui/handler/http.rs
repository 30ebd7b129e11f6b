//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{ConnectRoomForm, CreateRoomForm, RoomCreatedDto, RoomSummaryDto},
    ui::{error::ApiError, state::AppState},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a room from the `name` / `access` form
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateRoomForm>,
) -> Result<(StatusCode, Json<RoomCreatedDto>), ApiError> {
    let id = state
        .create_room_usecase
        .execute(form.name, &form.access)
        .await?;
    tracing::info!("Room {} created via API", id);
    Ok((StatusCode::CREATED, Json(id.into())))
}

/// Look up the room a browser is about to connect to
pub async fn connect_room(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ConnectRoomForm>,
) -> Result<Json<RoomSummaryDto>, ApiError> {
    let room = state.get_room_usecase.execute(&form.id).await?;
    Ok(Json(room.into()))
}

/// List public rooms, newest first
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.list_public_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.into_iter().map(RoomSummaryDto::from).collect())
}

/// Get room summary by ID
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, ApiError> {
    let room = state.get_room_usecase.execute(&room_id).await?;
    Ok(Json(room.into()))
}
