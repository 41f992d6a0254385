use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::comment::models::Comment;
use crate::comment::repositories::CommentRepository;
use kpix_common::error::{KpixError, KpixResult};

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COMMENT_COLUMNS: &str = "id, kpi_id, action_plan_id, org_id, author_id, content, created_at";

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, comment: Comment) -> KpixResult<Comment> {
        if comment.kpi_id.is_some() == comment.action_plan_id.is_some() {
            return Err(KpixError::Validation(
                "comment must reference exactly one of kpi_id or action_plan_id".to_string(),
            ));
        }

        let row = sqlx::query(&format!(
            "insert into comments
             (id, kpi_id, action_plan_id, org_id, author_id, content, created_at)
             values ($1, $2, $3, $4, $5, $6, $7)
             returning {COMMENT_COLUMNS}"
        ))
        .bind(comment.id)
        .bind(comment.kpi_id)
        .bind(comment.action_plan_id)
        .bind(comment.org_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        Ok(map_comment_row(&row))
    }

    async fn list_for_kpi(&self, org_id: Uuid, kpi_id: Uuid) -> KpixResult<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "select {COMMENT_COLUMNS} from comments
             where org_id = $1 and kpi_id = $2
             order by created_at desc"
        ))
        .bind(org_id)
        .bind(kpi_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        Ok(rows.iter().map(map_comment_row).collect())
    }

    async fn list_for_action(&self, org_id: Uuid, action_id: Uuid) -> KpixResult<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "select {COMMENT_COLUMNS} from comments
             where org_id = $1 and action_plan_id = $2
             order by created_at desc"
        ))
        .bind(org_id)
        .bind(action_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))?;

        Ok(rows.iter().map(map_comment_row).collect())
    }
}

fn map_comment_row(row: &sqlx::postgres::PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        kpi_id: row.get("kpi_id"),
        action_plan_id: row.get("action_plan_id"),
        org_id: row.get("org_id"),
        author_id: row.get("author_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;
    use chrono::Utc;

    pub(crate) async fn ensure_comment_table(pool: &PgPool) {
        sqlx::query(
            "create table if not exists comments (
              id uuid primary key,
              kpi_id uuid,
              action_plan_id uuid,
              org_id uuid not null,
              author_id uuid,
              content text not null,
              created_at timestamptz not null default now()
            )",
        )
        .execute(pool)
        .await
        .expect("create comments");
    }

    async fn test_repo() -> Option<PgCommentRepository> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");
        ensure_comment_table(&pool).await;
        Some(PgCommentRepository::new(pool))
    }

    fn make_kpi_comment(org_id: Uuid, kpi_id: Uuid, content: &str) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            kpi_id: Some(kpi_id),
            action_plan_id: None,
            org_id,
            author_id: None,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_and_list_kpi_comment() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let org = Uuid::new_v4();
        let kpi = Uuid::new_v4();
        repo.create(make_kpi_comment(org, kpi, "Supplier change in progress"))
            .await
            .expect("create");

        let listed = repo.list_for_kpi(org, kpi).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "Supplier change in progress");
    }

    #[tokio::test]
    async fn comment_with_both_parents_is_rejected() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let comment = Comment {
            id: Uuid::new_v4(),
            kpi_id: Some(Uuid::new_v4()),
            action_plan_id: Some(Uuid::new_v4()),
            org_id: Uuid::new_v4(),
            author_id: None,
            content: "invalid".to_string(),
            created_at: Utc::now(),
        };
        let result = repo.create(comment).await;
        assert!(matches!(result, Err(KpixError::Validation(_))));
    }

    #[tokio::test]
    async fn comment_with_no_parent_is_rejected() {
        let repo = match test_repo().await {
            Some(r) => r,
            None => return,
        };
        let comment = Comment {
            id: Uuid::new_v4(),
            kpi_id: None,
            action_plan_id: None,
            org_id: Uuid::new_v4(),
            author_id: None,
            content: "orphan".to_string(),
            created_at: Utc::now(),
        };
        let result = repo.create(comment).await;
        assert!(matches!(result, Err(KpixError::Validation(_))));
    }
}
