use axum::extract::{Query, State};
use axum::Json;
use uuid::Uuid;

use kpix_common::error::KpixError;
use kpix_db::action::models::ActionPlan;
use kpix_db::action::repositories::ActionRepository;
use kpix_db::dashboard::models::Dashboard;
use kpix_db::dashboard::repositories::DashboardRepository;
use kpix_db::kpi::models::{Kpi, KpiValue};
use kpix_db::kpi::repositories::{KpiRepository, KpiValueRepository};
use kpix_reporting::{
    build_direction_report, build_overview, build_top_risks, DirectionOverview,
    DEFAULT_TOP_RISKS_LIMIT, MAX_TOP_RISKS_LIMIT,
};

use crate::error::ApiError;
use crate::extractors::OrgId;
use crate::reporting::requests::TopRisksQuery;
use crate::reporting::responses::{OverviewResponse, TopRisksResponse};
use crate::AppState;

async fn load_snapshot(
    state: &AppState,
    org: Uuid,
) -> Result<(Vec<Dashboard>, Vec<Kpi>, Vec<KpiValue>, Vec<ActionPlan>), ApiError> {
    let dashboards = state.dashboard_repo.list(org).await?;
    let kpis = KpiRepository::list_for_org(&state.kpi_repo, org).await?;
    let values = KpiValueRepository::list_for_org(&state.kpi_repo, org).await?;
    let actions = state.action_repo.list_for_org(org).await?;
    Ok((dashboards, kpis, values, actions))
}

pub async fn overview(
    State(state): State<AppState>,
    OrgId(org): OrgId,
) -> Result<Json<OverviewResponse>, ApiError> {
    let (dashboards, kpis, values, actions) = load_snapshot(&state, org).await?;
    let today = chrono::Utc::now().date_naive();
    let data = build_overview(&dashboards, &kpis, &values, &actions, today)?;
    let count = data.len();
    Ok(Json(OverviewResponse { data, count }))
}

pub async fn top_risks(
    State(state): State<AppState>,
    OrgId(org): OrgId,
    Query(params): Query<TopRisksQuery>,
) -> Result<Json<TopRisksResponse>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_RISKS_LIMIT);
    if limit < 1 || limit > MAX_TOP_RISKS_LIMIT {
        return Err(ApiError(KpixError::Validation(format!(
            "limit must be between 1 and {MAX_TOP_RISKS_LIMIT}"
        ))));
    }

    let dashboards = state.dashboard_repo.list(org).await?;
    let kpis = KpiRepository::list_for_org(&state.kpi_repo, org).await?;
    let values = KpiValueRepository::list_for_org(&state.kpi_repo, org).await?;
    let items = build_top_risks(&dashboards, &kpis, &values, limit)?;
    Ok(Json(TopRisksResponse { items }))
}

pub async fn direction(
    State(state): State<AppState>,
    OrgId(org): OrgId,
) -> Result<Json<DirectionOverview>, ApiError> {
    let (dashboards, kpis, values, actions) = load_snapshot(&state, org).await?;
    let report =
        build_direction_report(&dashboards, &kpis, &values, &actions, chrono::Utc::now())?;
    Ok(Json(report))
}
