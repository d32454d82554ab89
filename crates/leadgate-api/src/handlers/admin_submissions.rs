//! Admin listing of stored submissions, newest first.

use axum::{extract::State, Json};
use leadgate_core::models::StoredSubmission;

use crate::error::HttpAppError;
use crate::state::AppState;

pub async fn list_submissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredSubmission>>, HttpAppError> {
    let submissions = state.submissions.list_submissions().await?;
    Ok(Json(submissions))
}
