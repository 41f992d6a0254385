use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use kpix_common::error::{KpixError, KpixResult};
use kpix_db::action::models::ActionPlan;
use kpix_db::dashboard::models::Dashboard;
use kpix_db::kpi::models::{Kpi, KpiValue};

use crate::models::{DashboardOverview, StatusBreakdown};
use crate::status::latest_status_per_kpi;

/// Build one overview card per dashboard, in the order the dashboards are
/// given. A KPI referencing a missing dashboard, or a value or action
/// referencing a missing KPI, makes the whole snapshot unusable and is
/// reported as an inconsistency rather than silently skipped.
pub fn build_overview(
    dashboards: &[Dashboard],
    kpis: &[Kpi],
    values: &[KpiValue],
    actions: &[ActionPlan],
    today: NaiveDate,
) -> KpixResult<Vec<DashboardOverview>> {
    let dashboard_ids: HashSet<Uuid> = dashboards.iter().map(|d| d.id).collect();

    let mut kpi_dashboard: HashMap<Uuid, Uuid> = HashMap::new();
    for kpi in kpis {
        if !dashboard_ids.contains(&kpi.dashboard_id) {
            return Err(KpixError::Inconsistency(format!(
                "KPI {} references unknown dashboard {}",
                kpi.id, kpi.dashboard_id
            )));
        }
        kpi_dashboard.insert(kpi.id, kpi.dashboard_id);
    }
    for value in values {
        if !kpi_dashboard.contains_key(&value.kpi_id) {
            return Err(KpixError::Inconsistency(format!(
                "value {} references unknown KPI {}",
                value.id, value.kpi_id
            )));
        }
    }

    let latest = latest_status_per_kpi(values);

    let mut totals: HashMap<Uuid, u32> = HashMap::new();
    let mut breakdowns: HashMap<Uuid, StatusBreakdown> = HashMap::new();
    for kpi in kpis {
        *totals.entry(kpi.dashboard_id).or_default() += 1;
        if let Some(status) = latest.get(&kpi.id) {
            breakdowns.entry(kpi.dashboard_id).or_default().bump(*status);
        }
    }

    // (open, overdue) per dashboard
    let mut action_counts: HashMap<Uuid, (u32, u32)> = HashMap::new();
    for action in actions {
        let dashboard_id = kpi_dashboard.get(&action.kpi_id).ok_or_else(|| {
            KpixError::Inconsistency(format!(
                "action {} references unknown KPI {}",
                action.id, action.kpi_id
            ))
        })?;
        if !action.status.is_open() {
            continue;
        }
        let counts = action_counts.entry(*dashboard_id).or_default();
        counts.0 += 1;
        if action.due_date.is_some_and(|due| due < today) {
            counts.1 += 1;
        }
    }

    Ok(dashboards
        .iter()
        .map(|dashboard| {
            let (open, overdue) = action_counts.get(&dashboard.id).copied().unwrap_or((0, 0));
            DashboardOverview {
                dashboard_id: dashboard.id,
                title: dashboard.title.clone(),
                process_name: dashboard.process_name.clone(),
                total_kpis: totals.get(&dashboard.id).copied().unwrap_or(0),
                status_breakdown: breakdowns.get(&dashboard.id).copied().unwrap_or_default(),
                open_actions: open,
                overdue_actions: overdue,
            }
        })
        .collect())
}
