//! Test helpers: build AppState and router for integration tests.
//!
//! Storage is a per-test temp directory behind `LocalStore`; email
//! notifications are disabled and no chat provider keys are set. Environment
//! variables shared by every test in a binary are set exactly once.

use std::sync::Arc;
use std::sync::Once;

use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use leadgate_api::auth::AdminAuth;
use leadgate_api::middleware::FixedWindowLimiter;
use leadgate_api::services::{ChatService, IntakePipeline, Notifier};
use leadgate_api::setup::routes::setup_routes;
use leadgate_api::state::AppState;
use leadgate_core::Config;
use leadgate_storage::{LocalStore, SubmissionStore};
use tempfile::TempDir;

pub const TEST_ADMIN_USER: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";

static ENV: Once = Once::new();

fn test_config() -> Config {
    ENV.call_once(|| {
        std::env::set_var("ENVIRONMENT", "development");
        std::env::set_var("STORAGE_BACKEND", "local");
        std::env::set_var("ENABLE_EMAIL_NOTIFICATIONS", "false");
        std::env::set_var("ADMIN_USERNAME", TEST_ADMIN_USER);
        std::env::set_var("ADMIN_PASSWORD", TEST_ADMIN_PASSWORD);
        std::env::remove_var("OPENROUTER_API_KEY");
        std::env::remove_var("GROQ_API_KEY");
        std::env::remove_var("RESEND_API_KEY");
        std::env::remove_var("SMTP_HOST");
    });
    Config::from_env().expect("test config")
}

/// Test application: server plus the temp directory backing its store.
pub struct TestApp {
    pub server: TestServer,
    temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Filesystem path of the backing object store.
    pub fn storage_path(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// Count of persisted submission documents.
    pub fn stored_submission_count(&self) -> usize {
        let dir = self.temp_dir.path().join("submissions");
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_limits(5, 20).await
}

/// Build an app with explicit per-window attempt limits. Each app owns its
/// limiters, so tests on the shared "unknown" client key stay isolated.
pub async fn setup_test_app_with_limits(submit_max: u32, chat_max: u32) -> TestApp {
    let config = test_config();

    let temp_dir = tempfile::tempdir().expect("temp directory");
    let store = LocalStore::new(
        temp_dir.path(),
        "http://localhost:3000/files".to_string(),
    )
    .await
    .expect("local store");
    let object_store: Arc<dyn leadgate_storage::ObjectStore> = Arc::new(store);
    let submissions = SubmissionStore::new(object_store.clone());

    let notifier = Arc::new(Notifier::from_config(&config));
    let pipeline = Arc::new(IntakePipeline::new(
        submissions.clone(),
        notifier.clone(),
        true,
    ));

    let state = AppState {
        config: config.clone(),
        object_store,
        submissions,
        pipeline,
        notifier,
        chat: Arc::new(ChatService::from_config(&config)),
        admin_auth: Arc::new(AdminAuth::from_config(&config)),
        submit_limiter: Arc::new(FixedWindowLimiter::new(15 * 60 * 1000, submit_max)),
        chat_limiter: Arc::new(FixedWindowLimiter::new(60 * 1000, chat_max)),
    };

    let router = setup_routes(&config, state).expect("router");
    TestApp {
        server: TestServer::new(router).expect("test server"),
        temp_dir,
    }
}

/// Minimal payload passing every validation rule.
pub fn valid_submission() -> serde_json::Value {
    serde_json::json!({
        "name": "Ana",
        "email": "a@b.com",
        "brandName": "Ana Co",
        "whyNow": "the moment is right",
        "successMetrics": "more qualified leads",
        "struggles": ["overwhelmed"],
        "communication": "email"
    })
}

pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{password}")))
}
