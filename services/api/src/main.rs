mod action;
mod comment;
mod dashboard;
mod error;
mod extractors;
mod kpi;
mod reporting;
mod user;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use kpix_common::types::ServiceInfo;
use kpix_config::{init_tracing, AppConfig};
use kpix_db::action::pg_repository::PgActionRepository;
use kpix_db::comment::pg_repository::PgCommentRepository;
use kpix_db::dashboard::pg_repository::PgDashboardRepository;
use kpix_db::kpi::pg_repository::PgKpiRepository;
use kpix_db::user::pg_repository::PgUserRepository;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_repo: PgDashboardRepository,
    pub kpi_repo: PgKpiRepository,
    pub action_repo: PgActionRepository,
    pub comment_repo: PgCommentRepository,
    pub user_repo: PgUserRepository,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("kpix-api"))
}

async fn metrics() -> impl IntoResponse {
    let body = "\
# HELP kpix_up Service up indicator\n\
# TYPE kpix_up gauge\n\
kpix_up 1\n\
# HELP kpix_info Service info\n\
# TYPE kpix_info gauge\n\
kpix_info{service=\"kpix-api\",version=\"0.1.0\"} 1\n";

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            "x-org-id".parse().unwrap(),
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(dashboard::router())
        .merge(kpi::router())
        .merge(action::router())
        .merge(comment::router())
        .merge(user::router())
        .merge(reporting::router())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = AppConfig::from_env().expect("failed to load config");
    tracing::info!(service = "kpix-api", "starting");

    let pool = kpix_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let state = AppState {
        dashboard_repo: PgDashboardRepository::new(pool.clone()),
        kpi_repo: PgKpiRepository::new(pool.clone()),
        action_repo: PgActionRepository::new(pool.clone()),
        comment_repo: PgCommentRepository::new(pool.clone()),
        user_repo: PgUserRepository::new(pool),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
