use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use kpix_common::error::KpixError;
use kpix_db::action::repositories::ActionRepository;
use kpix_db::comment::models::Comment;
use kpix_db::comment::repositories::CommentRepository;
use kpix_db::kpi::repositories::KpiRepository;

use crate::comment::requests::CreateCommentRequest;
use crate::comment::responses::ListCommentsResponse;
use crate::error::ApiError;
use crate::extractors::OrgId;
use crate::AppState;

fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError(KpixError::Validation(
            "content must not be empty".to_string(),
        )));
    }
    Ok(())
}

pub async fn list_kpi_comments(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<ListCommentsResponse>, ApiError> {
    let _kpi = KpiRepository::get_by_id(&state.kpi_repo, org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("KPI not found: {id}"))))?;

    let data = state.comment_repo.list_for_kpi(org, id).await?;
    let count = data.len();
    Ok(Json(ListCommentsResponse { data, count }))
}

pub async fn create_kpi_comment(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let _kpi = KpiRepository::get_by_id(&state.kpi_repo, org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("KPI not found: {id}"))))?;
    validate_content(&body.content)?;

    let comment = Comment {
        id: Uuid::new_v4(),
        kpi_id: Some(id),
        action_plan_id: None,
        org_id: org,
        author_id: body.author_id,
        content: body.content,
        created_at: chrono::Utc::now(),
    };

    let created = state.comment_repo.create(comment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_action_comments(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<ListCommentsResponse>, ApiError> {
    let _action = state
        .action_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("action not found: {id}"))))?;

    let data = state.comment_repo.list_for_action(org, id).await?;
    let count = data.len();
    Ok(Json(ListCommentsResponse { data, count }))
}

pub async fn create_action_comment(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let _action = state
        .action_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("action not found: {id}"))))?;
    validate_content(&body.content)?;

    let comment = Comment {
        id: Uuid::new_v4(),
        kpi_id: None,
        action_plan_id: Some(id),
        org_id: org,
        author_id: body.author_id,
        content: body.content,
        created_at: chrono::Utc::now(),
    };

    let created = state.comment_repo.create(comment).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
