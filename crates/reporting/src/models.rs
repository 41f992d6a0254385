use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kpix_db::action::models::ActionStatus;
use kpix_db::kpi::models::{KpiDirection, KpiStatus};

/// Count of KPIs per latest status. KPIs without any value are counted in
/// none of the buckets, so the buckets may sum to less than the KPI total.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBreakdown {
    #[serde(rename = "GREEN")]
    pub green: u32,
    #[serde(rename = "ORANGE")]
    pub orange: u32,
    #[serde(rename = "RED")]
    pub red: u32,
}

impl StatusBreakdown {
    pub fn bump(&mut self, status: KpiStatus) {
        match status {
            KpiStatus::Green => self.green += 1,
            KpiStatus::Orange => self.orange += 1,
            KpiStatus::Red => self.red += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.green + self.orange + self.red
    }
}

/// One dashboard card of the home screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardOverview {
    pub dashboard_id: Uuid,
    pub title: String,
    pub process_name: Option<String>,
    pub total_kpis: u32,
    pub status_breakdown: StatusBreakdown,
    pub open_actions: u32,
    pub overdue_actions: u32,
}

/// A single KPI value enriched with its KPI and dashboard context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectionKpiSnapshot {
    pub kpi_id: Uuid,
    pub kpi_name: String,
    pub dashboard_id: Uuid,
    pub dashboard_title: String,
    pub unit: Option<String>,
    pub value: f64,
    pub status: KpiStatus,
    pub period_end: NaiveDate,
}

/// A KPI whose latest value sits in the ORANGE or RED band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopRiskKpi {
    pub kpi_id: Uuid,
    pub kpi_name: String,
    pub dashboard_id: Uuid,
    pub dashboard_title: String,
    pub status: KpiStatus,
    pub value: f64,
    pub period_end: NaiveDate,
}

/// Movement of a KPI between its two most recent values.
///
/// `delta_normalized` is oriented so that a positive number always means
/// improvement, whichever way the KPI points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectionKpiTrend {
    pub kpi_id: Uuid,
    pub kpi_name: String,
    pub dashboard_id: Uuid,
    pub dashboard_title: String,
    pub unit: Option<String>,
    pub direction: KpiDirection,
    pub current_value: f64,
    pub previous_value: f64,
    pub current_status: KpiStatus,
    pub previous_status: KpiStatus,
    pub delta: f64,
    pub delta_normalized: f64,
}

/// An action plan enriched with its KPI and dashboard context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectionActionSummary {
    pub action_id: Uuid,
    pub title: String,
    pub status: ActionStatus,
    pub progress: i32,
    pub due_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
    pub kpi_id: Uuid,
    pub kpi_name: String,
    pub dashboard_id: Uuid,
    pub dashboard_title: String,
}

/// The cross-dashboard executive report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DirectionOverview {
    pub top_red_kpis: Vec<DirectionKpiSnapshot>,
    pub latest_values: Vec<DirectionKpiSnapshot>,
    pub improving_kpis: Vec<DirectionKpiTrend>,
    pub worsening_kpis: Vec<DirectionKpiTrend>,
    pub overdue_actions: Vec<DirectionActionSummary>,
    pub upcoming_actions_48h: Vec<DirectionActionSummary>,
    pub upcoming_actions_7d: Vec<DirectionActionSummary>,
    pub closed_actions_this_week: Vec<DirectionActionSummary>,
    /// Reserved for KPIs flagged as strategic; the flag does not exist in
    /// the data model yet, so this list is always empty.
    pub strategic_kpis: Vec<DirectionKpiSnapshot>,
}
