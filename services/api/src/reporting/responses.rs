use serde::Serialize;

use kpix_reporting::{DashboardOverview, TopRiskKpi};

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub data: Vec<DashboardOverview>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TopRisksResponse {
    pub items: Vec<TopRiskKpi>,
}
