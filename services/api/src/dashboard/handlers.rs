use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use kpix_common::error::KpixError;
use kpix_db::dashboard::models::Dashboard;
use kpix_db::dashboard::repositories::DashboardRepository;
use kpix_db::kpi::models::Kpi;
use kpix_db::kpi::repositories::KpiRepository;
use kpix_reporting::{validate_thresholds, Thresholds};

use crate::dashboard::requests::{CreateDashboardRequest, CreateKpiRequest, UpdateDashboardRequest};
use crate::dashboard::responses::{ListDashboardsResponse, ListKpisResponse};
use crate::error::ApiError;
use crate::extractors::OrgId;
use crate::AppState;

pub async fn list_dashboards(
    State(state): State<AppState>,
    OrgId(org): OrgId,
) -> Result<Json<ListDashboardsResponse>, ApiError> {
    let data = state.dashboard_repo.list(org).await?;
    let count = data.len();
    Ok(Json(ListDashboardsResponse { data, count }))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<Dashboard>, ApiError> {
    let dashboard = state
        .dashboard_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("dashboard not found: {id}"))))?;
    Ok(Json(dashboard))
}

pub async fn create_dashboard(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Json(body): Json<CreateDashboardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError(KpixError::Validation(
            "title must not be empty".to_string(),
        )));
    }

    let dashboard = Dashboard {
        id: Uuid::new_v4(),
        org_id: org,
        owner_id: body.owner_id,
        title: body.title,
        description: body.description,
        process_name: body.process_name,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    let created = state.dashboard_repo.create(dashboard).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_dashboard(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateDashboardRequest>,
) -> Result<Json<Dashboard>, ApiError> {
    let existing = state
        .dashboard_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("dashboard not found: {id}"))))?;

    let title = body.title.unwrap_or(existing.title);
    if title.trim().is_empty() {
        return Err(ApiError(KpixError::Validation(
            "title must not be empty".to_string(),
        )));
    }

    let dashboard = Dashboard {
        id,
        org_id: org,
        owner_id: body.owner_id.or(existing.owner_id),
        title,
        description: body.description.or(existing.description),
        process_name: body.process_name.or(existing.process_name),
        created_at: existing.created_at,
        updated_at: chrono::Utc::now(),
    };

    let updated = state.dashboard_repo.update(dashboard).await?;
    Ok(Json(updated))
}

pub async fn delete_dashboard(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.dashboard_repo.delete(org, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_dashboard_kpis(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<ListKpisResponse>, ApiError> {
    let _dashboard = state
        .dashboard_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("dashboard not found: {id}"))))?;

    let data = KpiRepository::list_for_dashboard(&state.kpi_repo, org, id).await?;
    let count = data.len();
    Ok(Json(ListKpisResponse { data, count }))
}

pub async fn create_kpi(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateKpiRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let _dashboard = state
        .dashboard_repo
        .get_by_id(org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("dashboard not found: {id}"))))?;

    if body.name.trim().is_empty() {
        return Err(ApiError(KpixError::Validation(
            "name must not be empty".to_string(),
        )));
    }
    validate_thresholds(
        body.direction,
        Thresholds {
            green: body.threshold_green,
            orange: body.threshold_orange,
            red: body.threshold_red,
        },
    )?;

    let kpi = Kpi {
        id: Uuid::new_v4(),
        dashboard_id: id,
        org_id: org,
        owner_id: body.owner_id,
        name: body.name,
        unit: body.unit,
        frequency: body.frequency,
        direction: body.direction,
        threshold_green: body.threshold_green,
        threshold_orange: body.threshold_orange,
        threshold_red: body.threshold_red,
        is_active: true,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    let created = KpiRepository::create(&state.kpi_repo, kpi).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
