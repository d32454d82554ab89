use std::sync::Arc;

use leadgate_core::Config;
use leadgate_storage::{ObjectStore, SubmissionStore};

use crate::auth::AdminAuth;
use crate::middleware::FixedWindowLimiter;
use crate::services::{ChatService, IntakePipeline, Notifier};

/// Shared application state. Cheap to clone; every field is either a handle
/// or behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub object_store: Arc<dyn ObjectStore>,
    pub submissions: SubmissionStore,
    pub pipeline: Arc<IntakePipeline>,
    pub notifier: Arc<Notifier>,
    pub chat: Arc<ChatService>,
    pub admin_auth: Arc<AdminAuth>,
    pub submit_limiter: Arc<FixedWindowLimiter>,
    pub chat_limiter: Arc<FixedWindowLimiter>,
}
