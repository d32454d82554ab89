//! Route configuration and setup

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use leadgate_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth_middleware;
use crate::handlers;
use crate::middleware::rate_limit_middleware;
use crate::state::AppState;

/// JSON bodies are small except uploads, which carry base64 file content.
const MAX_BODY_BYTES: usize = 80 * 1024 * 1024;

/// Decoded upload bodies can reach the configured max file size, so bound how
/// many are in flight at once.
const MAX_CONCURRENT_UPLOADS: usize = 8;

pub fn setup_routes(config: &Config, state: AppState) -> anyhow::Result<Router> {
    let cors = setup_cors(config)?;

    let submit_routes = Router::new()
        .route("/api/submit", post(handlers::submit::submit_form))
        .layer(from_fn_with_state(
            state.submit_limiter.clone(),
            rate_limit_middleware,
        ));

    let chat_routes = Router::new()
        .route("/api/chat", post(handlers::chat::chat))
        .layer(from_fn_with_state(
            state.chat_limiter.clone(),
            rate_limit_middleware,
        ));

    let admin_routes = Router::new()
        .route(
            "/api/admin/submissions",
            get(handlers::admin_submissions::list_submissions),
        )
        .route("/api/admin/export-csv", get(handlers::export_csv::export_csv))
        .layer(from_fn_with_state(
            state.admin_auth.clone(),
            admin_auth_middleware,
        ));

    let upload_routes = Router::new()
        .route("/api/upload", post(handlers::upload::upload_file))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_UPLOADS));

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(upload_routes)
        .merge(submit_routes)
        .merge(chat_routes)
        .merge(admin_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

fn setup_cors(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Ok(match config.cors_origin() {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid CORS_ORIGIN: {}", origin))?;
            cors.allow_origin(origin)
        }
        None => cors.allow_origin(Any),
    })
}
