//! Pure reporting logic: status classification and the aggregated views
//! served by the API. Everything here is deterministic; time is always an
//! explicit argument.

pub mod direction;
pub mod models;
pub mod overview;
pub mod status;
pub mod top_risks;

pub use direction::{build_direction_report, latest_value};
pub use models::{
    DashboardOverview, DirectionActionSummary, DirectionKpiSnapshot, DirectionKpiTrend,
    DirectionOverview, StatusBreakdown, TopRiskKpi,
};
pub use overview::build_overview;
pub use top_risks::{build_top_risks, DEFAULT_TOP_RISKS_LIMIT, MAX_TOP_RISKS_LIMIT};
pub use status::{compute_status, latest_status_per_kpi, validate_thresholds, Thresholds};
