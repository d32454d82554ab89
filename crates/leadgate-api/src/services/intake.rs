//! Intake pipeline
//!
//! The one path from a raw inbound payload to a persisted submission:
//! validate, sanitize, persist with overwrite disallowed, then best-effort
//! email notification. A notification failure never fails the submission.

use std::sync::Arc;
use std::time::Duration;

use leadgate_core::models::{Submission, SubmissionPayload};
use leadgate_core::validation::{sanitize_payload, validate_payload};
use leadgate_core::AppError;
use leadgate_storage::{StorageError, SubmissionStore};

use crate::error::storage_error_to_app;
use crate::services::Notifier;

/// Retries when the timestamp-derived id collides with an existing key.
/// Millisecond resolution makes collisions possible under bursts; each retry
/// regenerates id and timestamp from a fresh clock reading.
const ID_CONFLICT_RETRIES: u32 = 3;

/// Result of a successful intake run.
#[derive(Debug, Clone)]
pub struct IntakeOutcome {
    pub submission_id: String,
    pub timestamp: String,
    pub blob_url: String,
    pub blob_size: u64,
    pub notified: bool,
}

pub struct IntakePipeline {
    submissions: SubmissionStore,
    notifier: Arc<Notifier>,
    /// Whether to strip markup characters before persisting. On by default;
    /// exists so a deployment that trusts its inputs can store them verbatim.
    sanitize: bool,
}

impl IntakePipeline {
    pub fn new(submissions: SubmissionStore, notifier: Arc<Notifier>, sanitize: bool) -> Self {
        IntakePipeline {
            submissions,
            notifier,
            sanitize,
        }
    }

    pub async fn run(&self, payload: SubmissionPayload) -> Result<IntakeOutcome, AppError> {
        let report = validate_payload(&payload);
        if !report.is_valid() {
            tracing::debug!(fields = report.errors.len(), "Submission failed validation");
            return Err(AppError::Validation(report.errors));
        }

        let fields = if self.sanitize {
            sanitize_payload(&payload)
        } else {
            payload
        };

        let (submission, stored) = self.persist(fields).await?;

        let notified = match self.notifier.notify(&submission).await {
            Ok(sent) => sent,
            Err(error) => {
                tracing::error!(
                    submission_id = %submission.id,
                    %error,
                    "Notification email failed; submission is already persisted"
                );
                false
            }
        };

        Ok(IntakeOutcome {
            submission_id: submission.id,
            timestamp: submission.timestamp,
            blob_url: stored.url,
            blob_size: stored.size,
            notified,
        })
    }

    async fn persist(
        &self,
        fields: SubmissionPayload,
    ) -> Result<(Submission, leadgate_storage::StoredObject), AppError> {
        let mut submission = Submission::new(fields);
        let mut attempts = 0;
        loop {
            match self.submissions.put_submission(&submission).await {
                Ok(stored) => return Ok((submission, stored)),
                Err(StorageError::AlreadyExists(key)) if attempts < ID_CONFLICT_RETRIES => {
                    attempts += 1;
                    tracing::warn!(
                        key = %key,
                        attempt = attempts,
                        "Submission id collision; regenerating"
                    );
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    let (id, timestamp) = Submission::generate_identity();
                    submission.id = id;
                    submission.timestamp = timestamp;
                }
                Err(error) => return Err(storage_error_to_app(error)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgate_core::Config;
    use leadgate_storage::{LocalStore, SubmissionStore};
    use std::sync::Once;

    static ENV: Once = Once::new();

    async fn pipeline(dir: &std::path::Path) -> (IntakePipeline, SubmissionStore) {
        ENV.call_once(|| {
            std::env::set_var("ENVIRONMENT", "development");
            std::env::set_var("STORAGE_BACKEND", "local");
            std::env::set_var("ENABLE_EMAIL_NOTIFICATIONS", "false");
        });
        let store = LocalStore::new(dir, "http://localhost:3000/files".to_string())
            .await
            .expect("local store");
        let submissions = SubmissionStore::new(Arc::new(store));
        let config = Config::from_env().expect("test config");
        let notifier = Arc::new(Notifier::from_config(&config));
        (
            IntakePipeline::new(submissions.clone(), notifier, true),
            submissions,
        )
    }

    fn valid_payload() -> SubmissionPayload {
        SubmissionPayload {
            name: Some("Ana".to_string()),
            email: Some("a@b.com".to_string()),
            brand_name: Some("Ana Co".to_string()),
            why_now: Some("the moment is right".to_string()),
            success_metrics: Some("more leads".to_string()),
            struggles: vec!["overwhelmed".to_string()],
            communication: Some("email".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected_before_persistence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (pipeline, submissions) = pipeline(dir.path()).await;

        let err = pipeline
            .run(SubmissionPayload::default())
            .await
            .expect_err("empty payload");
        assert!(matches!(err, AppError::Validation(_)));
        assert!(submissions
            .list_submissions()
            .await
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn valid_payload_is_sanitized_and_persisted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (pipeline, submissions) = pipeline(dir.path()).await;

        let mut payload = valid_payload();
        payload.name = Some("  Ana <script> ".to_string());

        let outcome = pipeline.run(payload).await.expect("intake");
        assert!(outcome.submission_id.ends_with('Z'));
        assert!(!outcome.notified, "email disabled in tests");

        let listed = submissions.list_submissions().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0].submission.fields.name.as_deref(),
            Some("Ana script")
        );
    }

    #[tokio::test]
    async fn rapid_submissions_all_get_distinct_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (pipeline, submissions) = pipeline(dir.path()).await;

        for _ in 0..3 {
            pipeline.run(valid_payload()).await.expect("intake");
        }

        let listed = submissions.list_submissions().await.expect("list");
        assert_eq!(listed.len(), 3);
    }
}
