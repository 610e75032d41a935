//! Audio item like handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use callboard_core::{ItemId, LikeCount, LikeToggle};
use callboard_store::LikeStore;

use crate::error::ApiError;
use crate::extract::{JsonBody, UserBody, UserPath};
use crate::state::AppState;

/// Heart counts of every item.
#[derive(Debug, Serialize)]
pub struct LikesResponse {
    /// One row per item, by item id.
    pub data: Vec<LikeCount>,
}

/// List heart counts.
pub async fn list_likes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LikesResponse>, ApiError> {
    Ok(Json(LikesResponse {
        data: state.store.list_likes()?,
    }))
}

/// Like an item, or withdraw the like if the user already gave one.
pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
    JsonBody(request): JsonBody<UserBody>,
) -> Result<Json<LikeToggle>, ApiError> {
    let item_id: u32 = item_id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid item id: {item_id}")))?;
    let user_id = request.require()?;
    let toggle = state.store.toggle_like(ItemId(item_id), user_id)?;

    tracing::debug!(user_id = %user_id, item_id, hearts = toggle.hearts, liked = toggle.liked, "Like toggled");
    Ok(Json(toggle))
}

/// Items a user likes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLikesResponse {
    /// Item ids, ascending.
    pub liked_players: Vec<ItemId>,
}

/// List the items a user likes.
pub async fn user_likes(
    State(state): State<Arc<AppState>>,
    UserPath(user_id): UserPath,
) -> Result<Json<UserLikesResponse>, ApiError> {
    Ok(Json(UserLikesResponse {
        liked_players: state.store.liked_items(user_id)?,
    }))
}
