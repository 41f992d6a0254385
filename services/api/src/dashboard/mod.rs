pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboards", get(handlers::list_dashboards))
        .route("/dashboards", post(handlers::create_dashboard))
        .route("/dashboards/{id}", get(handlers::get_dashboard))
        .route("/dashboards/{id}", put(handlers::update_dashboard))
        .route("/dashboards/{id}", delete(handlers::delete_dashboard))
        .route("/dashboards/{id}/kpis", get(handlers::list_dashboard_kpis))
        .route("/dashboards/{id}/kpis", post(handlers::create_kpi))
}
