use std::collections::HashMap;

use chrono::{DateTime, Days, Duration, Utc};
use uuid::Uuid;

use kpix_common::error::{KpixError, KpixResult};
use kpix_db::action::models::{ActionPlan, ActionStatus};
use kpix_db::dashboard::models::Dashboard;
use kpix_db::kpi::models::{Kpi, KpiDirection, KpiStatus, KpiValue};

use crate::models::{
    DirectionActionSummary, DirectionKpiSnapshot, DirectionKpiTrend, DirectionOverview,
};
use crate::status::is_newer;

const TOP_RED_LIMIT: usize = 5;
const LATEST_VALUES_LIMIT: usize = 20;
const TREND_LIMIT: usize = 3;

/// Build the cross-dashboard executive report for one organization.
///
/// `now` anchors every time window so the same snapshot always yields the
/// same report. Orphaned references between the slices are reported as an
/// inconsistency; the report is all-or-nothing.
pub fn build_direction_report(
    dashboards: &[Dashboard],
    kpis: &[Kpi],
    values: &[KpiValue],
    actions: &[ActionPlan],
    now: DateTime<Utc>,
) -> KpixResult<DirectionOverview> {
    let dashboards_by_id: HashMap<Uuid, &Dashboard> =
        dashboards.iter().map(|d| (d.id, d)).collect();
    let kpis_by_id: HashMap<Uuid, &Kpi> = kpis.iter().map(|k| (k.id, k)).collect();

    // Newest-first value history per KPI
    let mut history: HashMap<Uuid, Vec<&KpiValue>> = HashMap::new();
    for value in values {
        resolve_kpi(
            &kpis_by_id,
            &dashboards_by_id,
            value.kpi_id,
            &format!("value {}", value.id),
        )?;
        history.entry(value.kpi_id).or_default().push(value);
    }
    for series in history.values_mut() {
        series.sort_by(|a, b| {
            (b.period_end, b.created_at).cmp(&(a.period_end, a.created_at))
        });
    }

    let mut report = DirectionOverview::default();

    for kpi in kpis {
        let Some(series) = history.get(&kpi.id) else {
            continue;
        };
        let dashboard = dashboards_by_id
            .get(&kpi.dashboard_id)
            .copied()
            .ok_or_else(|| {
                KpixError::Inconsistency(format!(
                    "KPI {} references unknown dashboard {}",
                    kpi.id, kpi.dashboard_id
                ))
            })?;
        let newest = series[0];

        if newest.status == KpiStatus::Red {
            report.top_red_kpis.push(snapshot(kpi, dashboard, newest));
        }

        if let Some(previous) = series.get(1) {
            let delta = newest.value - previous.value;
            let delta_normalized = match kpi.direction {
                KpiDirection::UpIsBetter => delta,
                KpiDirection::DownIsBetter => -delta,
            };
            if delta_normalized != 0.0 {
                let trend = DirectionKpiTrend {
                    kpi_id: kpi.id,
                    kpi_name: kpi.name.clone(),
                    dashboard_id: dashboard.id,
                    dashboard_title: dashboard.title.clone(),
                    unit: kpi.unit.clone(),
                    direction: kpi.direction,
                    current_value: newest.value,
                    previous_value: previous.value,
                    current_status: newest.status,
                    previous_status: previous.status,
                    delta,
                    delta_normalized,
                };
                if delta_normalized > 0.0 {
                    report.improving_kpis.push(trend);
                } else {
                    report.worsening_kpis.push(trend);
                }
            }
        }
    }

    report
        .top_red_kpis
        .sort_by(|a, b| b.period_end.cmp(&a.period_end));
    report.top_red_kpis.truncate(TOP_RED_LIMIT);

    report
        .improving_kpis
        .sort_by(|a, b| b.delta_normalized.total_cmp(&a.delta_normalized));
    report.improving_kpis.truncate(TREND_LIMIT);
    report
        .worsening_kpis
        .sort_by(|a, b| a.delta_normalized.total_cmp(&b.delta_normalized));
    report.worsening_kpis.truncate(TREND_LIMIT);

    let mut newest_first: Vec<&KpiValue> = values.iter().collect();
    newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    for value in newest_first.into_iter().take(LATEST_VALUES_LIMIT) {
        let (kpi, dashboard) = resolve_kpi(
            &kpis_by_id,
            &dashboards_by_id,
            value.kpi_id,
            &format!("value {}", value.id),
        )?;
        report.latest_values.push(snapshot(kpi, dashboard, value));
    }

    let today = now.date_naive();
    let in_48h = today + Days::new(2);
    let in_7d = today + Days::new(7);
    let week_ago = now - Duration::days(7);

    for action in actions {
        let (kpi, dashboard) = resolve_kpi(
            &kpis_by_id,
            &dashboards_by_id,
            action.kpi_id,
            &format!("action {}", action.id),
        )?;
        let entry = summarize(action, kpi, dashboard);

        if action.status == ActionStatus::Done {
            if action.updated_at >= week_ago {
                report.closed_actions_this_week.push(entry);
            }
            continue;
        }
        if !action.status.is_open() {
            continue;
        }
        let Some(due) = action.due_date else {
            continue;
        };
        // The three windows partition the timeline around `today`
        if due < today {
            report.overdue_actions.push(entry);
        } else if due <= in_48h {
            report.upcoming_actions_48h.push(entry);
        } else if due <= in_7d {
            report.upcoming_actions_7d.push(entry);
        }
    }

    report.overdue_actions.sort_by_key(|a| a.due_date);
    report.upcoming_actions_48h.sort_by_key(|a| a.due_date);
    report.upcoming_actions_7d.sort_by_key(|a| a.due_date);
    report
        .closed_actions_this_week
        .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    Ok(report)
}

fn resolve_kpi<'a>(
    kpis_by_id: &HashMap<Uuid, &'a Kpi>,
    dashboards_by_id: &HashMap<Uuid, &'a Dashboard>,
    kpi_id: Uuid,
    referrer: &str,
) -> KpixResult<(&'a Kpi, &'a Dashboard)> {
    let kpi = kpis_by_id.get(&kpi_id).copied().ok_or_else(|| {
        KpixError::Inconsistency(format!("{referrer} references unknown KPI {kpi_id}"))
    })?;
    let dashboard = dashboards_by_id
        .get(&kpi.dashboard_id)
        .copied()
        .ok_or_else(|| {
            KpixError::Inconsistency(format!(
                "KPI {} references unknown dashboard {}",
                kpi.id, kpi.dashboard_id
            ))
        })?;
    Ok((kpi, dashboard))
}

/// Newest value of a KPI, if it has any.
pub fn latest_value<'a>(values: &'a [KpiValue], kpi_id: Uuid) -> Option<&'a KpiValue> {
    values
        .iter()
        .filter(|v| v.kpi_id == kpi_id)
        .reduce(|best, v| if is_newer(v, best) { v } else { best })
}

fn snapshot(kpi: &Kpi, dashboard: &Dashboard, value: &KpiValue) -> DirectionKpiSnapshot {
    DirectionKpiSnapshot {
        kpi_id: kpi.id,
        kpi_name: kpi.name.clone(),
        dashboard_id: dashboard.id,
        dashboard_title: dashboard.title.clone(),
        unit: kpi.unit.clone(),
        value: value.value,
        status: value.status,
        period_end: value.period_end,
    }
}

fn summarize(action: &ActionPlan, kpi: &Kpi, dashboard: &Dashboard) -> DirectionActionSummary {
    DirectionActionSummary {
        action_id: action.id,
        title: action.title.clone(),
        status: action.status,
        progress: action.progress,
        due_date: action.due_date,
        updated_at: action.updated_at,
        kpi_id: kpi.id,
        kpi_name: kpi.name.clone(),
        dashboard_id: dashboard.id,
        dashboard_title: dashboard.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use kpix_db::kpi::models::{KpiFrequency, KpiStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 10, 9, 0, 0).unwrap()
    }

    fn dashboard(title: &str) -> Dashboard {
        Dashboard {
            id: Uuid::new_v4(),
            org_id: Uuid::new_v4(),
            owner_id: None,
            title: title.to_string(),
            description: None,
            process_name: None,
            created_at: anchor(),
            updated_at: anchor(),
        }
    }

    fn kpi(dashboard_id: Uuid, name: &str, direction: KpiDirection) -> Kpi {
        let (green, orange, red) = match direction {
            KpiDirection::UpIsBetter => (97.0, 95.0, 93.0),
            KpiDirection::DownIsBetter => (3.0, 4.0, 5.0),
        };
        Kpi {
            id: Uuid::new_v4(),
            dashboard_id,
            org_id: Uuid::new_v4(),
            owner_id: None,
            name: name.to_string(),
            unit: Some("%".to_string()),
            frequency: KpiFrequency::Weekly,
            direction,
            threshold_green: green,
            threshold_orange: orange,
            threshold_red: red,
            is_active: true,
            created_at: anchor(),
            updated_at: anchor(),
        }
    }

    fn value(
        kpi: &Kpi,
        period_end: NaiveDate,
        raw: f64,
        created_at: DateTime<Utc>,
    ) -> KpiValue {
        let status = crate::status::compute_status(
            kpi.direction,
            crate::status::Thresholds {
                green: kpi.threshold_green,
                orange: kpi.threshold_orange,
                red: kpi.threshold_red,
            },
            raw,
        );
        KpiValue {
            id: Uuid::new_v4(),
            kpi_id: kpi.id,
            org_id: kpi.org_id,
            period_start: period_end - Days::new(6),
            period_end,
            value: raw,
            status,
            comment: None,
            created_at,
        }
    }

    fn action(
        kpi_id: Uuid,
        status: ActionStatus,
        due_date: Option<NaiveDate>,
        updated_at: DateTime<Utc>,
    ) -> ActionPlan {
        ActionPlan {
            id: Uuid::new_v4(),
            kpi_id,
            org_id: Uuid::new_v4(),
            title: "Plan d'action".to_string(),
            description: None,
            owner_id: None,
            due_date,
            progress: 50,
            status,
            created_at: anchor(),
            updated_at,
        }
    }

    #[test]
    fn scrap_rate_improvement_scenario() {
        // DOWN_IS_BETTER KPI dropping from 5.1 to 4.2 is an improvement
        let dash = dashboard("Qualité");
        let mut scrap = kpi(dash.id, "Taux de rebut", KpiDirection::DownIsBetter);
        scrap.threshold_green = 3.5;
        scrap.threshold_orange = 4.5;
        scrap.threshold_red = 5.5;
        let values = vec![
            value(&scrap, date(2024, 11, 25), 5.1, anchor() - Duration::days(8)),
            value(&scrap, date(2024, 12, 2), 4.2, anchor() - Duration::days(1)),
        ];

        let report =
            build_direction_report(&[dash], &[scrap.clone()], &values, &[], anchor()).unwrap();

        assert!(report.top_red_kpis.is_empty());
        assert_eq!(report.improving_kpis.len(), 1);
        let trend = &report.improving_kpis[0];
        assert_eq!(trend.kpi_id, scrap.id);
        assert!((trend.delta - -0.9).abs() < 1e-9);
        assert!((trend.delta_normalized - 0.9).abs() < 1e-9);
        assert_eq!(trend.current_status, KpiStatus::Orange);
        assert_eq!(trend.previous_status, KpiStatus::Red);
        assert_eq!(report.latest_values[0].kpi_id, scrap.id);
        assert_eq!(report.latest_values[0].status, KpiStatus::Orange);
    }

    #[test]
    fn top_red_is_capped_and_sorted_by_period_end() {
        let dash = dashboard("Production");
        let mut kpis = Vec::new();
        let mut values = Vec::new();
        for i in 0..7u32 {
            let k = kpi(dash.id, &format!("KPI {i}"), KpiDirection::UpIsBetter);
            values.push(value(
                &k,
                date(2024, 12, 1) + Days::new(u64::from(i)),
                50.0, // far below red threshold
                anchor() - Duration::hours(i64::from(i)),
            ));
            kpis.push(k);
        }

        let report = build_direction_report(&[dash], &kpis, &values, &[], anchor()).unwrap();
        assert_eq!(report.top_red_kpis.len(), 5);
        let ends: Vec<_> = report.top_red_kpis.iter().map(|s| s.period_end).collect();
        let mut sorted = ends.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ends, sorted);
        assert_eq!(ends[0], date(2024, 12, 7));
    }

    #[test]
    fn action_windows_are_disjoint() {
        let dash = dashboard("Production");
        let k = kpi(dash.id, "OTD", KpiDirection::UpIsBetter);
        let overdue = action(k.id, ActionStatus::Open, Some(date(2024, 12, 9)), anchor());
        let soon = action(k.id, ActionStatus::Open, Some(date(2024, 12, 11)), anchor());
        let week = action(k.id, ActionStatus::InProgress, Some(date(2024, 12, 15)), anchor());
        let far = action(k.id, ActionStatus::Open, Some(date(2025, 1, 20)), anchor());
        let undated = action(k.id, ActionStatus::Open, None, anchor());

        let report = build_direction_report(
            &[dash],
            &[k],
            &[],
            &[overdue.clone(), soon.clone(), week.clone(), far, undated],
            anchor(),
        )
        .unwrap();

        assert_eq!(report.overdue_actions.len(), 1);
        assert_eq!(report.overdue_actions[0].action_id, overdue.id);
        assert_eq!(report.upcoming_actions_48h.len(), 1);
        assert_eq!(report.upcoming_actions_48h[0].action_id, soon.id);
        assert_eq!(report.upcoming_actions_7d.len(), 1);
        assert_eq!(report.upcoming_actions_7d[0].action_id, week.id);
    }

    #[test]
    fn due_today_counts_as_upcoming_not_overdue() {
        let dash = dashboard("Production");
        let k = kpi(dash.id, "OTD", KpiDirection::UpIsBetter);
        let today_action = action(k.id, ActionStatus::Open, Some(date(2024, 12, 10)), anchor());
        let boundary = action(k.id, ActionStatus::Open, Some(date(2024, 12, 12)), anchor());

        let report =
            build_direction_report(&[dash], &[k], &[], &[today_action, boundary], anchor())
                .unwrap();
        assert!(report.overdue_actions.is_empty());
        assert_eq!(report.upcoming_actions_48h.len(), 2);
        assert!(report.upcoming_actions_7d.is_empty());
    }

    #[test]
    fn closed_this_week_requires_recent_done() {
        let dash = dashboard("Production");
        let k = kpi(dash.id, "OTD", KpiDirection::UpIsBetter);
        let recent = action(
            k.id,
            ActionStatus::Done,
            Some(date(2024, 12, 1)),
            anchor() - Duration::days(2),
        );
        let stale = action(
            k.id,
            ActionStatus::Done,
            Some(date(2024, 11, 1)),
            anchor() - Duration::days(10),
        );
        let cancelled = action(k.id, ActionStatus::Cancelled, None, anchor());

        let report = build_direction_report(
            &[dash],
            &[k],
            &[],
            &[recent.clone(), stale, cancelled],
            anchor(),
        )
        .unwrap();
        assert_eq!(report.closed_actions_this_week.len(), 1);
        assert_eq!(report.closed_actions_this_week[0].action_id, recent.id);
    }

    #[test]
    fn trend_lists_are_disjoint_and_skip_flat_kpis() {
        let dash = dashboard("Mixte");
        let up = kpi(dash.id, "Rendement", KpiDirection::UpIsBetter);
        let flat = kpi(dash.id, "Stable", KpiDirection::UpIsBetter);
        let down = kpi(dash.id, "Réclamations", KpiDirection::UpIsBetter);
        let values = vec![
            value(&up, date(2024, 11, 25), 90.0, anchor() - Duration::days(8)),
            value(&up, date(2024, 12, 2), 96.0, anchor() - Duration::days(1)),
            value(&flat, date(2024, 11, 25), 95.0, anchor() - Duration::days(8)),
            value(&flat, date(2024, 12, 2), 95.0, anchor() - Duration::days(1)),
            value(&down, date(2024, 11, 25), 98.0, anchor() - Duration::days(8)),
            value(&down, date(2024, 12, 2), 94.0, anchor() - Duration::days(1)),
        ];

        let report = build_direction_report(
            &[dash],
            &[up.clone(), flat.clone(), down.clone()],
            &values,
            &[],
            anchor(),
        )
        .unwrap();

        assert_eq!(report.improving_kpis.len(), 1);
        assert_eq!(report.improving_kpis[0].kpi_id, up.id);
        assert_eq!(report.worsening_kpis.len(), 1);
        assert_eq!(report.worsening_kpis[0].kpi_id, down.id);
        let improving: Vec<_> = report.improving_kpis.iter().map(|t| t.kpi_id).collect();
        assert!(!improving.contains(&flat.id));
        assert!(!improving.contains(&down.id));
    }

    #[test]
    fn trends_keep_only_the_three_largest_moves() {
        let dash = dashboard("Production");
        let mut kpis = Vec::new();
        let mut values = Vec::new();
        for i in 1..=5u32 {
            let k = kpi(dash.id, &format!("KPI {i}"), KpiDirection::UpIsBetter);
            values.push(value(&k, date(2024, 11, 25), 90.0, anchor() - Duration::days(8)));
            values.push(value(
                &k,
                date(2024, 12, 2),
                90.0 + f64::from(i),
                anchor() - Duration::days(1),
            ));
            kpis.push(k);
        }

        let report = build_direction_report(&[dash], &kpis, &values, &[], anchor()).unwrap();
        assert_eq!(report.improving_kpis.len(), 3);
        let deltas: Vec<_> = report
            .improving_kpis
            .iter()
            .map(|t| t.delta_normalized)
            .collect();
        assert_eq!(deltas, vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn latest_values_capped_at_twenty_newest_first() {
        let dash = dashboard("Production");
        let k = kpi(dash.id, "OTD", KpiDirection::UpIsBetter);
        let values: Vec<_> = (0..25u32)
            .map(|i| {
                value(
                    &k,
                    date(2024, 12, 1),
                    95.0,
                    anchor() - Duration::hours(i64::from(i)),
                )
            })
            .collect();

        let report =
            build_direction_report(&[dash], &[k], &values, &[], anchor()).unwrap();
        assert_eq!(report.latest_values.len(), 20);
    }

    #[test]
    fn strategic_kpis_is_always_empty() {
        let dash = dashboard("Production");
        let k = kpi(dash.id, "OTD", KpiDirection::UpIsBetter);
        let v = value(&k, date(2024, 12, 2), 99.0, anchor());
        let report = build_direction_report(&[dash], &[k], &[v], &[], anchor()).unwrap();
        assert!(report.strategic_kpis.is_empty());
    }

    #[test]
    fn orphan_references_fail_the_report() {
        let dash = dashboard("Production");
        let k = kpi(dash.id, "OTD", KpiDirection::UpIsBetter);
        let stray_value = value(&kpi(dash.id, "x", KpiDirection::UpIsBetter), date(2024, 12, 2), 95.0, anchor());

        let err = build_direction_report(&[dash.clone()], &[k.clone()], &[stray_value], &[], anchor())
            .unwrap_err();
        assert!(matches!(err, KpixError::Inconsistency(_)));

        let stray_action = action(Uuid::new_v4(), ActionStatus::Open, None, anchor());
        let err = build_direction_report(&[dash], &[k], &[], &[stray_action], anchor())
            .unwrap_err();
        assert!(matches!(err, KpixError::Inconsistency(_)));
    }

    #[test]
    fn report_is_deterministic() {
        let dash = dashboard("Qualité");
        let a = kpi(dash.id, "A", KpiDirection::UpIsBetter);
        let b = kpi(dash.id, "B", KpiDirection::DownIsBetter);
        let values = vec![
            value(&a, date(2024, 11, 25), 90.0, anchor() - Duration::days(8)),
            value(&a, date(2024, 12, 2), 96.0, anchor() - Duration::days(1)),
            value(&b, date(2024, 11, 25), 5.1, anchor() - Duration::days(8)),
            value(&b, date(2024, 12, 2), 4.2, anchor() - Duration::days(1)),
        ];
        let actions = vec![
            action(a.id, ActionStatus::Open, Some(date(2024, 12, 11)), anchor()),
            action(b.id, ActionStatus::Done, None, anchor() - Duration::days(1)),
        ];

        let dashboards = [dash];
        let kpis = [a, b];
        let first =
            build_direction_report(&dashboards, &kpis, &values, &actions, anchor()).unwrap();
        let second =
            build_direction_report(&dashboards, &kpis, &values, &actions, anchor()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn latest_value_breaks_ties_on_created_at() {
        let dash = dashboard("Qualité");
        let k = kpi(dash.id, "A", KpiDirection::UpIsBetter);
        let older = value(&k, date(2024, 12, 2), 90.0, anchor() - Duration::hours(2));
        let newer = value(&k, date(2024, 12, 2), 96.0, anchor());
        let values = vec![older, newer.clone()];
        assert_eq!(latest_value(&values, k.id).map(|v| v.id), Some(newer.id));
    }
}
