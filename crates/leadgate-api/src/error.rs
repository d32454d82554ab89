//! HTTP error response conversion
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<AppError>`) for errors and let
//! them become `HttpAppError` so they render consistently (status, body,
//! logging). The client body is always `{error, message}`, with an `errors`
//! map alongside for validation failures; internal detail is logged, never
//! returned, for sensitive variants.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leadgate_core::{AppError, ErrorMetadata, FieldErrors, LogLevel};
use leadgate_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Per-field validation messages; present only for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

/// Wrapper type for AppError to implement IntoResponse.
/// Necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from leadgate-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(err.to_string()))
    }
}

/// Convert a storage error to its domain equivalent. Conflicts and transport
/// failures both render as a generic 500 to the client; the distinction only
/// matters for logging and for the pipeline's conflict retry.
pub fn storage_error_to_app(err: StorageError) -> AppError {
    match err {
        StorageError::AlreadyExists(key) => AppError::AlreadyExists(key),
        StorageError::NotFound(key) => AppError::NotFound(key),
        StorageError::Unavailable(msg) => AppError::StoreUnavailable(msg),
        StorageError::FetchFailed { key, reason } => {
            AppError::StoreUnavailable(format!("fetch of {} failed: {}", key, reason))
        }
        StorageError::InvalidKey(key) => AppError::InvalidInput(format!("Invalid key: {}", key)),
        StorageError::Io(err) => AppError::Internal(format!("IO error: {}", err)),
        StorageError::Config(msg) => AppError::Config(msg),
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error_to_app(err))
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on
/// deserialization failure, instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&app_error);

        let errors = match &app_error {
            AppError::Validation(field_errors) => Some(field_errors.clone()),
            _ => None,
        };

        let body = Json(ErrorResponse {
            error: app_error.error_title(),
            message: app_error.client_message(),
            errors,
        });

        (status, body).into_response()
    }
}
