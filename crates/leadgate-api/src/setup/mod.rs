//! Application setup and initialization
//!
//! All wiring lives here so `main.rs` stays a thin entry point and
//! integration tests can build the full router against a test configuration.

pub mod routes;
pub mod server;
pub mod telemetry;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use leadgate_core::Config;
use leadgate_storage::{create_object_store, SubmissionStore};

use crate::auth::AdminAuth;
use crate::middleware::{spawn_sweeper, FixedWindowLimiter, RateLimitStore};
use crate::services::{ChatService, IntakePipeline, Notifier};
use crate::state::AppState;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Initialize the entire application: storage, services, and routes.
pub async fn initialize_app(config: Config) -> Result<(AppState, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!(summary = %config.summary(), "Configuration loaded");

    let object_store = create_object_store(&config)
        .await
        .context("Failed to set up object store")?;
    let submissions = SubmissionStore::new(object_store.clone());

    let notifier = Arc::new(Notifier::from_config(&config));
    let pipeline = Arc::new(IntakePipeline::new(
        submissions.clone(),
        notifier.clone(),
        true,
    ));
    let chat = Arc::new(ChatService::from_config(&config));
    let admin_auth = Arc::new(AdminAuth::from_config(&config));

    let submit_limiter = Arc::new(FixedWindowLimiter::new(
        config.rate_limit_window_ms(),
        config.rate_limit_max_attempts(),
    ));
    let chat_limiter = Arc::new(FixedWindowLimiter::new(
        config.chat_rate_limit_window_ms(),
        config.chat_rate_limit_max_attempts(),
    ));
    spawn_sweeper(
        vec![
            submit_limiter.clone() as Arc<dyn RateLimitStore>,
            chat_limiter.clone() as Arc<dyn RateLimitStore>,
        ],
        SWEEP_INTERVAL,
    );

    let state = AppState {
        config: config.clone(),
        object_store,
        submissions,
        pipeline,
        notifier,
        chat,
        admin_auth,
        submit_limiter,
        chat_limiter,
    };

    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
