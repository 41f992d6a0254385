use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::user::models::{User, UserRole};
use crate::user::repositories::UserRepository;
use kpix_common::error::{KpixError, KpixResult};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, org_id, email, full_name, role, is_active, created_at";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_id(&self, org_id: Uuid, id: Uuid) -> KpixResult<Option<User>> {
        let row = sqlx::query(&format!(
            "select {USER_COLUMNS} from users where org_id = $1 and id = $2"
        ))
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        row.map(|r| map_user_row(&r)).transpose()
    }

    async fn list(&self, org_id: Uuid) -> KpixResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "select {USER_COLUMNS} from users where org_id = $1 order by full_name"
        ))
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        rows.iter().map(map_user_row).collect()
    }
}

fn map_user_row(row: &sqlx::postgres::PgRow) -> KpixResult<User> {
    let role: String = row.get("role");
    Ok(User {
        id: row.get("id"),
        org_id: row.get("org_id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        role: UserRole::from_str(&role).map_err(KpixError::Internal)?,
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    })
}
