use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use kpix_common::error::KpixError;
use kpix_db::user::models::User;
use kpix_db::user::repositories::UserRepository;

use crate::error::ApiError;
use crate::extractors::OrgId;
use crate::user::responses::ListUsersResponse;
use crate::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    OrgId(org): OrgId,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let data = state.user_repo.list(org).await?;
    let count = data.len();
    Ok(Json(ListUsersResponse { data, count }))
}

pub async fn get_user(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .user_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("user not found: {id}"))))?;
    Ok(Json(user))
}
