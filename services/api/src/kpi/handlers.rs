use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use kpix_common::error::KpixError;
use kpix_db::kpi::models::{Kpi, KpiValue};
use kpix_db::kpi::repositories::{KpiRepository, KpiValueRepository};
use kpix_reporting::{compute_status, validate_thresholds, Thresholds};

use crate::error::ApiError;
use crate::extractors::OrgId;
use crate::kpi::requests::{CreateValueRequest, UpdateKpiRequest};
use crate::kpi::responses::ListValuesResponse;
use crate::AppState;

async fn load_kpi(state: &AppState, org: Uuid, id: Uuid) -> Result<Kpi, ApiError> {
    KpiRepository::get_by_id(&state.kpi_repo, org, id)
        .await?
        .ok_or_else(|| ApiError(KpixError::NotFound(format!("KPI not found: {id}"))))
}

pub async fn get_kpi(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<Kpi>, ApiError> {
    let kpi = load_kpi(&state, org, id).await?;
    Ok(Json(kpi))
}

pub async fn update_kpi(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateKpiRequest>,
) -> Result<Json<Kpi>, ApiError> {
    let existing = load_kpi(&state, org, id).await?;

    let name = body.name.unwrap_or(existing.name);
    if name.trim().is_empty() {
        return Err(ApiError(KpixError::Validation(
            "name must not be empty".to_string(),
        )));
    }

    let direction = body.direction.unwrap_or(existing.direction);
    let thresholds = Thresholds {
        green: body.threshold_green.unwrap_or(existing.threshold_green),
        orange: body.threshold_orange.unwrap_or(existing.threshold_orange),
        red: body.threshold_red.unwrap_or(existing.threshold_red),
    };
    validate_thresholds(direction, thresholds)?;

    let kpi = Kpi {
        id,
        dashboard_id: existing.dashboard_id,
        org_id: org,
        owner_id: body.owner_id.or(existing.owner_id),
        name,
        unit: body.unit.or(existing.unit),
        frequency: body.frequency.unwrap_or(existing.frequency),
        direction,
        threshold_green: thresholds.green,
        threshold_orange: thresholds.orange,
        threshold_red: thresholds.red,
        is_active: body.is_active.unwrap_or(existing.is_active),
        created_at: existing.created_at,
        updated_at: chrono::Utc::now(),
    };

    let updated = KpiRepository::update(&state.kpi_repo, kpi).await?;
    Ok(Json(updated))
}

pub async fn delete_kpi(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    KpiRepository::delete(&state.kpi_repo, org, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_values(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
) -> Result<Json<ListValuesResponse>, ApiError> {
    let _kpi = load_kpi(&state, org, id).await?;
    let data = KpiValueRepository::list_for_kpi(&state.kpi_repo, org, id).await?;
    let count = data.len();
    Ok(Json(ListValuesResponse { data, count }))
}

/// The status of a value is fixed at creation from the KPI's thresholds at
/// that moment. Later threshold changes never rewrite history.
pub async fn create_value(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateValueRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kpi = load_kpi(&state, org, id).await?;

    if body.period_start > body.period_end {
        return Err(ApiError(KpixError::Validation(
            "period_start must not be after period_end".to_string(),
        )));
    }
    if !body.value.is_finite() {
        return Err(ApiError(KpixError::Validation(
            "value must be a finite number".to_string(),
        )));
    }

    let status = compute_status(
        kpi.direction,
        Thresholds {
            green: kpi.threshold_green,
            orange: kpi.threshold_orange,
            red: kpi.threshold_red,
        },
        body.value,
    );

    let value = KpiValue {
        id: Uuid::new_v4(),
        kpi_id: id,
        org_id: org,
        period_start: body.period_start,
        period_end: body.period_end,
        value: body.value,
        status,
        comment: body.comment,
        created_at: chrono::Utc::now(),
    };

    let created = KpiValueRepository::create(&state.kpi_repo, value).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
