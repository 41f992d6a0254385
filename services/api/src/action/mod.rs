pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, post, put};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kpis/{id}/actions", get(handlers::list_actions))
        .route("/kpis/{id}/actions", post(handlers::create_action))
        .route("/actions/{id}", get(handlers::get_action))
        .route("/actions/{id}", put(handlers::update_action))
}
