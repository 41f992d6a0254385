pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reporting/overview", get(handlers::overview))
        .route("/reporting/top-risks", get(handlers::top_risks))
        .route("/reporting/direction", get(handlers::direction))
}
