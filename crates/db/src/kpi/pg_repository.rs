use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::kpi::models::{Kpi, KpiDirection, KpiFrequency, KpiStatus, KpiValue};
use crate::kpi::repositories::{KpiRepository, KpiValueRepository};
use kpix_common::error::{KpixError, KpixResult};

#[derive(Clone)]
pub struct PgKpiRepository {
    pool: PgPool,
}

impl PgKpiRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const KPI_COLUMNS: &str = "id, dashboard_id, org_id, owner_id, name, unit, frequency, direction, \
     threshold_green::float8 as threshold_green, \
     threshold_orange::float8 as threshold_orange, \
     threshold_red::float8 as threshold_red, \
     is_active, created_at, updated_at";

#[async_trait]
impl KpiRepository for PgKpiRepository {
    async fn create(&self, kpi: Kpi) -> KpixResult<Kpi> {
        let row = sqlx::query(&format!(
            "insert into kpis
             (id, dashboard_id, org_id, owner_id, name, unit, frequency, direction,
              threshold_green, threshold_orange, threshold_red, is_active, created_at, updated_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             returning {KPI_COLUMNS}"
        ))
        .bind(kpi.id)
        .bind(kpi.dashboard_id)
        .bind(kpi.org_id)
        .bind(kpi.owner_id)
        .bind(&kpi.name)
        .bind(&kpi.unit)
        .bind(kpi.frequency.as_str())
        .bind(kpi.direction.as_str())
        .bind(kpi.threshold_green)
        .bind(kpi.threshold_orange)
        .bind(kpi.threshold_red)
        .bind(kpi.is_active)
        .bind(kpi.created_at)
        .bind(kpi.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        map_kpi_row(&row)
    }

    async fn get_by_id(&self, org_id: Uuid, id: Uuid) -> KpixResult<Option<Kpi>> {
        let row = sqlx::query(&format!(
            "select {KPI_COLUMNS} from kpis where org_id = $1 and id = $2"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        row.map(|r| map_kpi_row(&r)).transpose()
    }

    async fn list_for_dashboard(&self, org_id: Uuid, dashboard_id: Uuid) -> KpixResult<Vec<Kpi>> {
        let rows = sqlx::query(&format!(
            "select {KPI_COLUMNS} from kpis
             where org_id = $1 and dashboard_id = $2
             order by name"
        ))
        .bind(org_id)
        .bind(dashboard_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        rows.iter().map(map_kpi_row).collect()
    }

    async fn list_for_org(&self, org_id: Uuid) -> KpixResult<Vec<Kpi>> {
        let rows = sqlx::query(&format!(
            "select {KPI_COLUMNS} from kpis where org_id = $1 order by name"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        rows.iter().map(map_kpi_row).collect()
    }

    async fn update(&self, kpi: Kpi) -> KpixResult<Kpi> {
        let row = sqlx::query(&format!(
            "update kpis
             set name = $3, unit = $4, frequency = $5, direction = $6,
                 threshold_green = $7, threshold_orange = $8, threshold_red = $9,
                 is_active = $10, owner_id = $11, updated_at = $12
             where org_id = $1 and id = $2
             returning {KPI_COLUMNS}"
        ))
        .bind(kpi.org_id)
        .bind(kpi.id)
        .bind(&kpi.name)
        .bind(&kpi.unit)
        .bind(kpi.frequency.as_str())
        .bind(kpi.direction.as_str())
        .bind(kpi.threshold_green)
        .bind(kpi.threshold_orange)
        .bind(kpi.threshold_red)
        .bind(kpi.is_active)
        .bind(kpi.owner_id)
        .bind(kpi.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?
        .ok_or_else(|| KpixError::NotFound(format!("KPI not found: {}", kpi.id)))?;

        map_kpi_row(&row)
    }

    async fn delete(&self, org_id: Uuid, id: Uuid) -> KpixResult<()> {
        let result = sqlx::query("delete from kpis where org_id = $1 and id = $2")
            .bind(org_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| KpixError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(KpixError::NotFound(format!("KPI not found: {id}")));
        }
        Ok(())
    }
}

const VALUE_COLUMNS: &str = "id, kpi_id, org_id, period_start, period_end, \
     value::float8 as value, status, comment, created_at";

#[async_trait]
impl KpiValueRepository for PgKpiRepository {
    async fn create(&self, value: KpiValue) -> KpixResult<KpiValue> {
        let row = sqlx::query(&format!(
            "insert into kpi_values
             (id, kpi_id, org_id, period_start, period_end, value, status, comment, created_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             returning {VALUE_COLUMNS}"
        ))
        .bind(value.id)
        .bind(value.kpi_id)
        .bind(value.org_id)
        .bind(value.period_start)
        .bind(value.period_end)
        .bind(value.value)
        .bind(value.status.as_str())
        .bind(&value.comment)
        .bind(value.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        map_value_row(&row)
    }

    async fn list_for_kpi(&self, org_id: Uuid, kpi_id: Uuid) -> KpixResult<Vec<KpiValue>> {
        let rows = sqlx::query(&format!(
            "select {VALUE_COLUMNS} from kpi_values
             where org_id = $1 and kpi_id = $2
             order by period_end desc, created_at desc"
        ))
        .bind(org_id)
        .bind(kpi_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        rows.iter().map(map_value_row).collect()
    }

    async fn list_for_org(&self, org_id: Uuid) -> KpixResult<Vec<KpiValue>> {
        let rows = sqlx::query(&format!(
            "select {VALUE_COLUMNS} from kpi_values where org_id = $1"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        rows.iter().map(map_value_row).collect()
    }
}

fn map_kpi_row(row: &sqlx::postgres::PgRow) -> KpixResult<Kpi> {
    let frequency: String = row.get("frequency");
    let direction: String = row.get("direction");
    Ok(Kpi {
        id: row.get("id"),
        dashboard_id: row.get("dashboard_id"),
        org_id: row.get("org_id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        unit: row.get("unit"),
        frequency: KpiFrequency::from_str(&frequency).map_err(KpixError::Internal)?,
        direction: KpiDirection::from_str(&direction).map_err(KpixError::Internal)?,
        threshold_green: row.get("threshold_green"),
        threshold_orange: row.get("threshold_orange"),
        threshold_red: row.get("threshold_red"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_value_row(row: &sqlx::postgres::PgRow) -> KpixResult<KpiValue> {
    let status: String = row.get("status");
    Ok(KpiValue {
        id: row.get("id"),
        kpi_id: row.get("kpi_id"),
        org_id: row.get("org_id"),
        period_start: row.get("period_start"),
        period_end: row.get("period_end"),
        value: row.get("value"),
        status: KpiStatus::from_str(&status).map_err(KpixError::Internal)?,
        comment: row.get("comment"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;
    use chrono::{NaiveDate, Utc};

    pub(crate) async fn ensure_kpi_tables(pool: &PgPool) {
        sqlx::query(
            "create table if not exists kpis (
              id uuid primary key,
              dashboard_id uuid not null,
              org_id uuid not null,
              owner_id uuid,
              name text not null,
              unit text,
              frequency text not null,
              direction text not null,
              threshold_green numeric(12,4) not null,
              threshold_orange numeric(12,4) not null,
              threshold_red numeric(12,4) not null,
              is_active boolean not null default true,
              created_at timestamptz not null default now(),
              updated_at timestamptz not null default now()
            )",
        )
        .execute(pool)
        .await
        .expect("create kpis");

        sqlx::query(
            "create table if not exists kpi_values (
              id uuid primary key,
              kpi_id uuid not null,
              org_id uuid not null,
              period_start date not null,
              period_end date not null,
              value numeric(14,4) not null,
              status text not null,
              comment text,
              created_at timestamptz not null default now()
            )",
        )
        .execute(pool)
        .await
        .expect("create kpi_values");
    }

    async fn test_repo() -> Option<PgKpiRepository> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");
        ensure_kpi_tables(&pool).await;
        Some(PgKpiRepository::new(pool))
    }

    fn make_kpi(org_id: Uuid, dashboard_id: Uuid, name: &str) -> Kpi {
        let now = Utc::now();
        Kpi {
            id: Uuid::new_v4(),
            dashboard_id,
            org_id,
            owner_id: None,
            name: name.to_string(),
            unit: Some("%".to_string()),
            frequency: KpiFrequency::Weekly,
            direction: KpiDirection::UpIsBetter,
            threshold_green: 97.0,
            threshold_orange: 95.0,
            threshold_red: 93.0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_value(org_id: Uuid, kpi_id: Uuid, day: u32, value: f64, status: KpiStatus) -> KpiValue {
        let period = NaiveDate::from_ymd_opt(2024, 12, day).unwrap();
        KpiValue {
            id: Uuid::new_v4(),
            kpi_id,
            org_id,
            period_start: period,
            period_end: period,
            value,
            status,
            comment: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_and_get_kpi_roundtrips_enums() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        let created = KpiRepository::create(&repo, make_kpi(org, Uuid::new_v4(), "Quality rate"))
            .await
            .expect("create");
        assert_eq!(created.frequency, KpiFrequency::Weekly);
        assert_eq!(created.direction, KpiDirection::UpIsBetter);

        let fetched = KpiRepository::get_by_id(&repo, org, created.id)
            .await
            .expect("get");
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn list_for_dashboard_scopes_rows() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        let dashboard = Uuid::new_v4();
        KpiRepository::create(&repo, make_kpi(org, dashboard, "A"))
            .await
            .expect("create");
        KpiRepository::create(&repo, make_kpi(org, Uuid::new_v4(), "B"))
            .await
            .expect("create");

        let listed = repo
            .list_for_dashboard(org, dashboard)
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "A");
    }

    #[tokio::test]
    async fn update_kpi_changes_thresholds() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        let mut kpi = KpiRepository::create(&repo, make_kpi(org, Uuid::new_v4(), "Scrap rate"))
            .await
            .expect("create");

        kpi.threshold_green = 98.5;
        let updated = repo.update(kpi).await.expect("update");
        assert!((updated.threshold_green - 98.5).abs() < 0.001);
    }

    #[tokio::test]
    async fn delete_is_org_scoped() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        let created = KpiRepository::create(&repo, make_kpi(org, Uuid::new_v4(), "Temp"))
            .await
            .expect("create");

        let err = repo.delete(Uuid::new_v4(), created.id).await.unwrap_err();
        assert!(matches!(err, KpixError::NotFound(_)));

        repo.delete(org, created.id).await.expect("delete");
        let fetched = KpiRepository::get_by_id(&repo, org, created.id)
            .await
            .expect("get");
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn values_listed_newest_period_first() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        let kpi = KpiRepository::create(&repo, make_kpi(org, Uuid::new_v4(), "OTD"))
            .await
            .expect("create");

        KpiValueRepository::create(&repo, make_value(org, kpi.id, 2, 96.0, KpiStatus::Orange))
            .await
            .expect("create value");
        KpiValueRepository::create(&repo, make_value(org, kpi.id, 9, 98.0, KpiStatus::Green))
            .await
            .expect("create value");

        let listed = repo.list_for_kpi(org, kpi.id).await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].status, KpiStatus::Green);
        assert_eq!(
            listed[0].period_end,
            NaiveDate::from_ymd_opt(2024, 12, 9).unwrap()
        );
    }
}
