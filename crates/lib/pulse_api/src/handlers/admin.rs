//! Admin-only endpoints. Routed behind the auth + admin-role middleware.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::UserDto;

/// GET /admin/users/{id}
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserDto>> {
    let record = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user with id {id}")))?;
    Ok(Json(UserDto::from(&record)))
}
