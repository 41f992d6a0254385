use std::collections::HashMap;

use uuid::Uuid;

use kpix_common::error::{KpixError, KpixResult};
use kpix_db::kpi::models::{KpiDirection, KpiStatus, KpiValue};

/// The three status cut-offs of a KPI, ordered per its direction.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub green: f64,
    pub orange: f64,
    pub red: f64,
}

/// Map a numeric value to a status given the KPI's direction and thresholds.
///
/// Total over finite values; comparisons are inclusive, so a value sitting
/// exactly on a threshold lands in the better bucket.
pub fn compute_status(direction: KpiDirection, thresholds: Thresholds, value: f64) -> KpiStatus {
    match direction {
        KpiDirection::UpIsBetter => {
            if value >= thresholds.green {
                KpiStatus::Green
            } else if value >= thresholds.orange {
                KpiStatus::Orange
            } else {
                KpiStatus::Red
            }
        }
        KpiDirection::DownIsBetter => {
            if value <= thresholds.green {
                KpiStatus::Green
            } else if value <= thresholds.orange {
                KpiStatus::Orange
            } else {
                KpiStatus::Red
            }
        }
    }
}

/// Thresholds must be monotone for the direction, otherwise `compute_status`
/// would produce contradictory results.
pub fn validate_thresholds(direction: KpiDirection, thresholds: Thresholds) -> KpixResult<()> {
    let ordered = match direction {
        KpiDirection::UpIsBetter => {
            thresholds.green >= thresholds.orange && thresholds.orange >= thresholds.red
        }
        KpiDirection::DownIsBetter => {
            thresholds.green <= thresholds.orange && thresholds.orange <= thresholds.red
        }
    };
    if !ordered {
        return Err(KpixError::Validation(format!(
            "thresholds must satisfy green {op} orange {op} red for {dir} KPIs",
            op = match direction {
                KpiDirection::UpIsBetter => ">=",
                KpiDirection::DownIsBetter => "<=",
            },
            dir = direction.as_str(),
        )));
    }
    Ok(())
}

/// Latest persisted status per KPI: the value with the largest `period_end`
/// wins, ties broken by `created_at` descending. KPIs without values are
/// absent from the map.
pub fn latest_status_per_kpi(values: &[KpiValue]) -> HashMap<Uuid, KpiStatus> {
    let mut newest: HashMap<Uuid, &KpiValue> = HashMap::new();
    for value in values {
        match newest.get(&value.kpi_id) {
            Some(current) if !is_newer(value, current) => {}
            _ => {
                newest.insert(value.kpi_id, value);
            }
        }
    }
    newest.into_iter().map(|(id, v)| (id, v.status)).collect()
}

pub(crate) fn is_newer(a: &KpiValue, b: &KpiValue) -> bool {
    (a.period_end, a.created_at) > (b.period_end, b.created_at)
}
