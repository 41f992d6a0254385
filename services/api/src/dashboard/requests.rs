use serde::Deserialize;
use uuid::Uuid;

use kpix_db::kpi::models::{KpiDirection, KpiFrequency};

#[derive(Debug, Deserialize)]
pub struct CreateDashboardRequest {
    pub title: String,
    pub description: Option<String>,
    pub process_name: Option<String>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDashboardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub process_name: Option<String>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateKpiRequest {
    pub name: String,
    pub unit: Option<String>,
    pub frequency: KpiFrequency,
    pub direction: KpiDirection,
    pub threshold_green: f64,
    pub threshold_orange: f64,
    pub threshold_red: f64,
    pub owner_id: Option<Uuid>,
}
