use std::net::SocketAddr;

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use routes::{category_router, questions_router, quizzes_router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::{method_not_allowed, ApiError};
use super::routes;

pub const API_PREFIX: &str = "/api/v1";

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub fn build_router(pool: SqlitePool) -> Router {
    let state = AppState::new(pool);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);

    let api = Router::new()
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quizzes_router(state))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors);

    Router::new()
        .route("/metrics", get(metrics))
        .nest(API_PREFIX, api)
        .fallback(|| async {
            tracing::info!("Fallback");
            ApiError::NotFound
        })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(pool: SqlitePool, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(pool);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    if let Err(e) = encoder.encode(&metrics, &mut buf) {
        tracing::error!("Failed to encode metrics: {e}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response()
}
