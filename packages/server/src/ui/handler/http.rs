//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of live rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let capacity = state.settings.room_capacity;
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(
        rooms
            .iter()
            .map(|room| RoomSummaryDto::from_room(room, capacity))
            .collect(),
    )
}

/// Get room detail by room code
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_code): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_code).await {
        Ok(room) => Ok(Json(RoomDetailDto::from_room(
            &room,
            state.settings.room_capacity,
        ))),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetRoomDetailError::InvalidRoomCode) => Err(StatusCode::BAD_REQUEST),
    }
}
