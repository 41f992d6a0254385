pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kpis/{id}", get(handlers::get_kpi))
        .route("/kpis/{id}", put(handlers::update_kpi))
        .route("/kpis/{id}", delete(handlers::delete_kpi))
        .route("/kpis/{id}/values", get(handlers::list_values))
        .route("/kpis/{id}/values", post(handlers::create_value))
}
