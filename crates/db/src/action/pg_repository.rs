use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::action::models::{ActionPlan, ActionStatus};
use crate::action::repositories::ActionRepository;
use kpix_common::error::{KpixError, KpixResult};

#[derive(Clone)]
pub struct PgActionRepository {
    pool: PgPool,
}

impl PgActionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ACTION_COLUMNS: &str = "id, kpi_id, org_id, title, description, owner_id, due_date, \
     progress, status, created_at, updated_at";

#[async_trait]
impl ActionRepository for PgActionRepository {
    async fn create(&self, action: ActionPlan) -> KpixResult<ActionPlan> {
        let row = sqlx::query(&format!(
            "insert into action_plans
             (id, kpi_id, org_id, title, description, owner_id, due_date,
              progress, status, created_at, updated_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             returning {ACTION_COLUMNS}"
        ))
        .bind(action.id)
        .bind(action.kpi_id)
        .bind(action.org_id)
        .bind(&action.title)
        .bind(&action.description)
        .bind(action.owner_id)
        .bind(action.due_date)
        .bind(action.progress)
        .bind(action.status.as_str())
        .bind(action.created_at)
        .bind(action.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        map_action_row(&row)
    }

    async fn get_by_id(&self, org_id: Uuid, id: Uuid) -> KpixResult<Option<ActionPlan>> {
        let row = sqlx::query(&format!(
            "select {ACTION_COLUMNS} from action_plans where org_id = $1 and id = $2"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        row.map(|r| map_action_row(&r)).transpose()
    }

    async fn list_for_kpi(&self, org_id: Uuid, kpi_id: Uuid) -> KpixResult<Vec<ActionPlan>> {
        let rows = sqlx::query(&format!(
            "select {ACTION_COLUMNS} from action_plans
             where org_id = $1 and kpi_id = $2
             order by created_at desc"
        ))
        .bind(org_id)
        .bind(kpi_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        rows.iter().map(map_action_row).collect()
    }

    async fn list_for_org(&self, org_id: Uuid) -> KpixResult<Vec<ActionPlan>> {
        let rows = sqlx::query(&format!(
            "select {ACTION_COLUMNS} from action_plans where org_id = $1"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        rows.iter().map(map_action_row).collect()
    }

    async fn update(&self, action: ActionPlan) -> KpixResult<ActionPlan> {
        let row = sqlx::query(&format!(
            "update action_plans
             set title = $3, description = $4, owner_id = $5, due_date = $6,
                 progress = $7, status = $8, updated_at = $9
             where org_id = $1 and id = $2
             returning {ACTION_COLUMNS}"
        ))
        .bind(action.org_id)
        .bind(action.id)
        .bind(&action.title)
        .bind(&action.description)
        .bind(action.owner_id)
        .bind(action.due_date)
        .bind(action.progress)
        .bind(action.status.as_str())
        .bind(action.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?
        .ok_or_else(|| KpixError::NotFound(format!("action not found: {}", action.id)))?;

        map_action_row(&row)
    }
}

fn map_action_row(row: &sqlx::postgres::PgRow) -> KpixResult<ActionPlan> {
    let status: String = row.get("status");
    Ok(ActionPlan {
        id: row.get("id"),
        kpi_id: row.get("kpi_id"),
        org_id: row.get("org_id"),
        title: row.get("title"),
        description: row.get("description"),
        owner_id: row.get("owner_id"),
        due_date: row.get("due_date"),
        progress: row.get("progress"),
        status: ActionStatus::from_str(&status).map_err(KpixError::Internal)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;
    use chrono::{NaiveDate, Utc};

    pub(crate) async fn ensure_action_table(pool: &PgPool) {
        sqlx::query(
            "create table if not exists action_plans (
              id uuid primary key,
              kpi_id uuid not null,
              org_id uuid not null,
              title text not null,
              description text,
              owner_id uuid,
              due_date date,
              progress integer not null default 0,
              status text not null,
              created_at timestamptz not null default now(),
              updated_at timestamptz not null default now()
            )",
        )
        .execute(pool)
        .await
        .expect("create action_plans");
    }

    async fn test_repo() -> Option<PgActionRepository> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");
        ensure_action_table(&pool).await;
        Some(PgActionRepository::new(pool))
    }

    fn make_action(org_id: Uuid, kpi_id: Uuid, title: &str) -> ActionPlan {
        let now = Utc::now();
        ActionPlan {
            id: Uuid::new_v4(),
            kpi_id,
            org_id,
            title: title.to_string(),
            description: None,
            owner_id: None,
            due_date: NaiveDate::from_ymd_opt(2024, 12, 20),
            progress: 0,
            status: ActionStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_and_get_action() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        let created = repo
            .create(make_action(org, Uuid::new_v4(), "Audit step 3"))
            .await
            .expect("create");
        assert_eq!(created.status, ActionStatus::Open);

        let fetched = repo.get_by_id(org, created.id).await.expect("get");
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn update_progress_and_status() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        let mut action = repo
            .create(make_action(org, Uuid::new_v4(), "Review transport plan"))
            .await
            .expect("create");

        action.progress = 60;
        action.status = ActionStatus::InProgress;
        let updated = repo.update(action).await.expect("update");
        assert_eq!(updated.progress, 60);
        assert_eq!(updated.status, ActionStatus::InProgress);
    }

    #[tokio::test]
    async fn list_for_org_excludes_other_orgs() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        repo.create(make_action(org, Uuid::new_v4(), "Mine"))
            .await
            .expect("create");
        repo.create(make_action(Uuid::new_v4(), Uuid::new_v4(), "Theirs"))
            .await
            .expect("create");

        let listed = repo.list_for_org(org).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Mine");
    }
}
