use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use kpix_common::error::{KpixError, KpixResult};
use kpix_db::dashboard::models::Dashboard;
use kpix_db::kpi::models::{Kpi, KpiStatus, KpiValue};

use crate::direction::latest_value;
use crate::models::TopRiskKpi;

pub const DEFAULT_TOP_RISKS_LIMIT: usize = 5;
pub const MAX_TOP_RISKS_LIMIT: usize = 50;

/// Rank the KPIs whose latest value is off target, worst first.
///
/// Only active KPIs are considered; a KPI without any value carries no risk
/// signal and is skipped. RED outranks ORANGE, and within one band the more
/// recently measured KPI comes first. Orphaned references are reported as an
/// inconsistency, like the other report builders.
pub fn build_top_risks(
    dashboards: &[Dashboard],
    kpis: &[Kpi],
    values: &[KpiValue],
    limit: usize,
) -> KpixResult<Vec<TopRiskKpi>> {
    let dashboards_by_id: HashMap<Uuid, &Dashboard> =
        dashboards.iter().map(|d| (d.id, d)).collect();
    let kpi_ids: HashSet<Uuid> = kpis.iter().map(|k| k.id).collect();

    for value in values {
        if !kpi_ids.contains(&value.kpi_id) {
            return Err(KpixError::Inconsistency(format!(
                "value {} references unknown KPI {}",
                value.id, value.kpi_id
            )));
        }
    }

    let mut items = Vec::new();
    for kpi in kpis.iter().filter(|k| k.is_active) {
        let Some(newest) = latest_value(values, kpi.id) else {
            continue;
        };
        if newest.status == KpiStatus::Green {
            continue;
        }
        let dashboard = dashboards_by_id
            .get(&kpi.dashboard_id)
            .copied()
            .ok_or_else(|| {
                KpixError::Inconsistency(format!(
                    "KPI {} references unknown dashboard {}",
                    kpi.id, kpi.dashboard_id
                ))
            })?;
        items.push(TopRiskKpi {
            kpi_id: kpi.id,
            kpi_name: kpi.name.clone(),
            dashboard_id: dashboard.id,
            dashboard_title: dashboard.title.clone(),
            status: newest.status,
            value: newest.value,
            period_end: newest.period_end,
        });
    }

    items.sort_by(|a, b| {
        (severity(b.status), b.period_end).cmp(&(severity(a.status), a.period_end))
    });
    items.truncate(limit);
    Ok(items)
}

fn severity(status: KpiStatus) -> u8 {
    match status {
        KpiStatus::Red => 2,
        KpiStatus::Orange => 1,
        KpiStatus::Green => 0,
    }
}
