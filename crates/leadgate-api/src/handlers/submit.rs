//! Form submission handler.

use axum::{extract::State, response::IntoResponse, Json};
use leadgate_core::models::SubmissionPayload;
use serde_json::json;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

pub async fn submit_form(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SubmissionPayload>,
) -> Result<impl IntoResponse, HttpAppError> {
    tracing::debug!(
        name = payload.name.as_deref().unwrap_or(""),
        has_files = !payload.files.is_empty(),
        "Form submission received"
    );

    let outcome = state.pipeline.run(payload).await?;

    tracing::info!(
        submission_id = %outcome.submission_id,
        blob_url = %outcome.blob_url,
        notified = outcome.notified,
        "Form submission processed"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Form submitted successfully",
        "data": {
            "submissionId": outcome.submission_id,
            "timestamp": outcome.timestamp,
            "blobUrl": outcome.blob_url,
            "size": outcome.blob_size,
        }
    })))
}
