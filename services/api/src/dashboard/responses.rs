use serde::Serialize;

use kpix_db::dashboard::models::Dashboard;
use kpix_db::kpi::models::Kpi;

#[derive(Debug, Serialize)]
pub struct ListDashboardsResponse {
    pub data: Vec<Dashboard>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ListKpisResponse {
    pub data: Vec<Kpi>,
    pub count: usize,
}
