pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kpis/{id}/comments", get(handlers::list_kpi_comments))
        .route("/kpis/{id}/comments", post(handlers::create_kpi_comment))
        .route("/actions/{id}/comments", get(handlers::list_action_comments))
        .route(
            "/actions/{id}/comments",
            post(handlers::create_action_comment),
        )
}
