//! File upload handler.
//!
//! Accepts a base64-encoded file body linked to a submission id. Unlike
//! submissions, uploads allow overwrite: re-uploading the same file for the
//! same submission replaces it.

use axum::{extract::State, response::IntoResponse, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use leadgate_core::AppError;
use leadgate_storage::{keys::upload_key, PutOptions};
use serde::Deserialize;
use serde_json::json;

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Base64-encoded file content.
    pub file: Option<String>,
    pub file_name: Option<String>,
    #[serde(default)]
    pub submission_id: Option<String>,
}

fn extension(file_name: &str) -> Option<String> {
    file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

pub async fn upload_file(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.config.file_upload_enabled() {
        return Err(HttpAppError(AppError::UploadsDisabled));
    }

    let (file, file_name) = match (&request.file, &request.file_name) {
        (Some(file), Some(file_name)) if !file.is_empty() && !file_name.is_empty() => {
            (file, file_name)
        }
        _ => {
            return Err(HttpAppError(AppError::InvalidInput(
                "Both file and fileName are required".to_string(),
            )));
        }
    };

    if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
        return Err(HttpAppError(AppError::InvalidInput(
            "Invalid file name".to_string(),
        )));
    }

    let allowed = state.config.allowed_file_types();
    let ext = extension(file_name).filter(|e| allowed.iter().any(|a| a == e));
    if ext.is_none() {
        return Err(HttpAppError(AppError::InvalidInput(format!(
            "Allowed file types: {}",
            allowed.join(", ")
        ))));
    }

    let data = BASE64.decode(file.as_bytes()).map_err(|_| {
        HttpAppError(AppError::InvalidInput(
            "File content must be base64 encoded".to_string(),
        ))
    })?;

    let max_size = state.config.max_file_size_bytes();
    if data.len() > max_size {
        return Err(HttpAppError(AppError::InvalidInput(format!(
            "Maximum file size: {}MB",
            max_size / 1024 / 1024
        ))));
    }

    let submission_id = request
        .submission_id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis().to_string());
    let key = upload_key(&submission_id, file_name);

    let stored = state
        .object_store
        .put(&key, data, PutOptions {
            allow_overwrite: true,
        })
        .await?;

    tracing::info!(
        submission_id = %submission_id,
        file_name = %file_name,
        key = %stored.key,
        size_bytes = stored.size,
        "File uploaded"
    );

    Ok(Json(json!({
        "success": true,
        "file": {
            "url": stored.url,
            "fileName": file_name,
            "uniqueFileName": stored.key,
            "size": stored.size,
            "uploadedAt": chrono::Utc::now().to_rfc3339(),
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_last_segment() {
        assert_eq!(extension("brief.PDF").as_deref(), Some("pdf"));
        assert_eq!(extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension("noext"), None);
    }
}
