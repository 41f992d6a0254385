use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use kpix_common::error::KpixError;
use kpix_db::action::models::{ActionPlan, ActionStatus};
use kpix_db::action::repositories::ActionRepository;
use kpix_db::kpi::repositories::KpiRepository;

use crate::action::requests::{CreateActionRequest, UpdateActionRequest};
use crate::action::responses::ListActionsResponse;
use crate::error::ApiError;
use crate::extractors::OrgId;
use crate::AppState;

fn validate_progress(progress: i32) -> Result<(), ApiError> {
    if !(0..=100).contains(&progress) {
        return Err(ApiError(KpixError::Validation(format!(
            "progress must be between 0 and 100, got {progress}"
        ))));
    }
    Ok(())
}

pub async fn list_actions(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<ListActionsResponse>, ApiError> {
    let _kpi = KpiRepository::get_by_id(&state.kpi_repo, org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("KPI not found: {id}"))))?;

    let data = state.action_repo.list_for_kpi(org, id).await?;
    let count = data.len();
    Ok(Json(ListActionsResponse { data, count }))
}

pub async fn create_action(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateActionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let _kpi = KpiRepository::get_by_id(&state.kpi_repo, org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("KPI not found: {id}"))))?;

    if body.title.trim().is_empty() {
        return Err(ApiError(KpixError::Validation(
            "title must not be empty".to_string(),
        )));
    }
    let progress = body.progress.unwrap_or(0);
    validate_progress(progress)?;

    let action = ActionPlan {
        id: Uuid::new_v4(),
        kpi_id: id,
        org_id: org,
        title: body.title,
        description: body.description,
        owner_id: body.owner_id,
        due_date: body.due_date,
        progress,
        status: ActionStatus::Open,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    let created = state.action_repo.create(action).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_action(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionPlan>, ApiError> {
    let action = state
        .action_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("action not found: {id}"))))?;
    Ok(Json(action))
}

pub async fn update_action(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateActionRequest>,
) -> Result<Json<ActionPlan>, ApiError> {
    let existing = state
        .action_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("action not found: {id}"))))?;

    let title = body.title.unwrap_or(existing.title);
    if title.trim().is_empty() {
        return Err(ApiError(KpixError::Validation(
            "title must not be empty".to_string(),
        )));
    }
    let progress = body.progress.unwrap_or(existing.progress);
    validate_progress(progress)?;

    let action = ActionPlan {
        id,
        kpi_id: existing.kpi_id,
        org_id: org,
        title,
        description: body.description.or(existing.description),
        owner_id: body.owner_id.or(existing.owner_id),
        due_date: body.due_date.or(existing.due_date),
        progress,
        status: body.status.unwrap_or(existing.status),
        created_at: existing.created_at,
        updated_at: chrono::Utc::now(),
    };

    let updated = state.action_repo.update(action).await?;
    Ok(Json(updated))
}
