use serde::Serialize;

use kpix_db::kpi::models::KpiValue;

#[derive(Debug, Serialize)]
pub struct ListValuesResponse {
    pub data: Vec<KpiValue>,
    pub count: usize,
}
