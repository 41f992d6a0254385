use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use kpix_db::kpi::models::{KpiDirection, KpiFrequency};

#[derive(Debug, Deserialize)]
pub struct UpdateKpiRequest {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub frequency: Option<KpiFrequency>,
    pub direction: Option<KpiDirection>,
    pub threshold_green: Option<f64>,
    pub threshold_orange: Option<f64>,
    pub threshold_red: Option<f64>,
    pub is_active: Option<bool>,
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateValueRequest {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub value: f64,
    pub comment: Option<String>,
}
