//! Admin CSV export of all submissions.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::csv::render_submissions_csv;

pub async fn export_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, HttpAppError> {
    let stored = state.submissions.list_submissions().await?;
    let submissions: Vec<_> = stored.into_iter().map(|s| s.submission).collect();
    let csv = render_submissions_csv(&submissions);

    tracing::info!(
        submissions = submissions.len(),
        size_bytes = csv.len(),
        "CSV export generated"
    );

    let filename = format!(
        "submissions-{}.csv",
        chrono::Utc::now().format("%Y-%m-%d")
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    Ok((headers, csv))
}
