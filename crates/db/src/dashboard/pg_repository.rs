use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::dashboard::models::Dashboard;
use crate::dashboard::repositories::DashboardRepository;
use kpix_common::error::{KpixError, KpixResult};

#[derive(Clone)]
pub struct PgDashboardRepository {
    pool: PgPool,
}

impl PgDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const DASHBOARD_COLUMNS: &str =
    "id, org_id, owner_id, title, description, process_name, created_at, updated_at";

#[async_trait]
impl DashboardRepository for PgDashboardRepository {
    async fn create(&self, dashboard: Dashboard) -> KpixResult<Dashboard> {
        let row = sqlx::query(&format!(
            "insert into dashboards
             (id, org_id, owner_id, title, description, process_name, created_at, updated_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8)
             returning {DASHBOARD_COLUMNS}"
        ))
        .bind(dashboard.id)
        .bind(dashboard.org_id)
        .bind(dashboard.owner_id)
        .bind(&dashboard.title)
        .bind(&dashboard.description)
        .bind(&dashboard.process_name)
        .bind(dashboard.created_at)
        .bind(dashboard.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        Ok(map_dashboard_row(&row))
    }

    async fn get_by_id(&self, org_id: Uuid, id: Uuid) -> KpixResult<Option<Dashboard>> {
        let row = sqlx::query(&format!(
            "select {DASHBOARD_COLUMNS} from dashboards where org_id = $1 and id = $2"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        Ok(row.map(|r| map_dashboard_row(&r)))
    }

    async fn list(&self, org_id: Uuid) -> KpixResult<Vec<Dashboard>> {
        let rows = sqlx::query(&format!(
            "select {DASHBOARD_COLUMNS} from dashboards where org_id = $1 order by title"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        Ok(rows.iter().map(map_dashboard_row).collect())
    }

    async fn update(&self, dashboard: Dashboard) -> KpixResult<Dashboard> {
        let row = sqlx::query(&format!(
            "update dashboards
             set title = $3, description = $4, process_name = $5, owner_id = $6, updated_at = $7
             where org_id = $1 and id = $2
             returning {DASHBOARD_COLUMNS}"
        ))
        .bind(dashboard.org_id)
        .bind(dashboard.id)
        .bind(&dashboard.title)
        .bind(&dashboard.description)
        .bind(&dashboard.process_name)
        .bind(dashboard.owner_id)
        .bind(dashboard.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?
        .ok_or_else(|| KpixError::NotFound(format!("dashboard not found: {}", dashboard.id)))?;

        Ok(map_dashboard_row(&row))
    }

    async fn delete(&self, org_id: Uuid, id: Uuid) -> KpixResult<()> {
        let result = sqlx::query("delete from dashboards where org_id = $1 and id = $2")
            .bind(org_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| KpixError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(KpixError::NotFound(format!("dashboard not found: {id}")));
        }
        Ok(())
    }
}

fn map_dashboard_row(row: &sqlx::postgres::PgRow) -> Dashboard {
    Dashboard {
        id: row.get("id"),
        org_id: row.get("org_id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        description: row.get("description"),
        process_name: row.get("process_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
