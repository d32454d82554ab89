//! Submission store layer
//!
//! Wraps the `ObjectStore` with submission-specific usage: one pretty-printed
//! JSON document per submission under `submissions/<id>.json`, written with
//! overwrite disallowed so a persisted record is immutable.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use leadgate_core::models::submission::{StoredSubmission, Submission};

use crate::keys::{submission_key, SUBMISSIONS_PREFIX};
use crate::traits::{ObjectStore, PutOptions, StorageResult, StoredObject};

#[derive(Clone)]
pub struct SubmissionStore {
    store: Arc<dyn ObjectStore>,
}

impl SubmissionStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        SubmissionStore { store }
    }

    /// Persist one submission. Overwrite is disallowed: a key conflict
    /// surfaces as `StorageError::AlreadyExists` and the existing record is
    /// left untouched.
    pub async fn put_submission(&self, submission: &Submission) -> StorageResult<StoredObject> {
        let key = submission_key(&submission.id);
        let json = serde_json::to_vec_pretty(submission).map_err(|e| {
            crate::traits::StorageError::Config(format!("Failed to encode submission: {}", e))
        })?;
        let stored = self
            .store
            .put(&key, json, PutOptions {
                allow_overwrite: false,
            })
            .await?;
        tracing::info!(
            submission_id = %submission.id,
            key = %key,
            size_bytes = stored.size,
            "Submission stored"
        );
        Ok(stored)
    }

    /// List every stored submission, newest first.
    ///
    /// Each object under the prefix is fetched and parsed independently: a
    /// malformed or unfetchable entry is logged and skipped, never aborting
    /// the batch. Entries whose timestamp does not parse sort after all
    /// parsable ones (treated as earliest).
    pub async fn list_submissions(&self) -> StorageResult<Vec<StoredSubmission>> {
        let metas = self.store.list(SUBMISSIONS_PREFIX).await?;
        let total = metas.len();

        let mut submissions = Vec::with_capacity(total);
        for meta in metas {
            let bytes = match self.store.get(&meta.key).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(key = %meta.key, error = %e, "Skipping unfetchable submission");
                    continue;
                }
            };
            let submission: Submission = match serde_json::from_slice(&bytes) {
                Ok(submission) => submission,
                Err(e) => {
                    tracing::warn!(key = %meta.key, error = %e, "Skipping malformed submission");
                    continue;
                }
            };
            submissions.push(StoredSubmission {
                submission,
                blob_url: meta.url,
                blob_size: Some(meta.size),
                blob_uploaded_at: meta.uploaded_at,
            });
        }

        // Newest first; unparsable timestamps (None) compare smallest and
        // therefore land at the end.
        submissions.sort_by(|a, b| {
            let ts_a = parse_timestamp(&a.submission.timestamp);
            let ts_b = parse_timestamp(&b.submission.timestamp);
            ts_b.cmp(&ts_a)
        });

        tracing::info!(
            loaded = submissions.len(),
            listed = total,
            "Submissions loaded"
        );
        Ok(submissions)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
