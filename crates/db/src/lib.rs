pub mod action;
pub mod comment;
pub mod dashboard;
pub mod kpi;
pub mod user;

use kpix_common::error::{KpixError, KpixResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create a Postgres connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> KpixResult<PgPool> {
    tracing::info!("connecting to database");
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| KpixError::Database(e.to_string()))
}
