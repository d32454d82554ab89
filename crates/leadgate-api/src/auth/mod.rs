//! Admin HTTP Basic authentication.
//!
//! Credentials come from `ADMIN_USERNAME`/`ADMIN_PASSWORD`. When they are not
//! configured the admin surface stays open in development (with a loud
//! warning) but is refused outright in production.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use leadgate_core::{AppError, Config};
use subtle::ConstantTimeEq;

use crate::error::HttpAppError;

pub const AUTH_CHALLENGE: &str = "Basic realm=\"Admin Dashboard\"";

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Verifier for the admin endpoints.
#[derive(Clone)]
pub struct AdminAuth {
    credentials: Option<(String, String)>,
    production: bool,
}

impl AdminAuth {
    pub fn from_config(config: &Config) -> Self {
        let credentials = match (config.admin_username(), config.admin_password()) {
            (Some(username), Some(password)) => Some((username.to_string(), password.to_string())),
            _ => None,
        };
        if credentials.is_none() {
            tracing::warn!(
                "ADMIN_USERNAME/ADMIN_PASSWORD not set; admin endpoints are unauthenticated"
            );
        }
        AdminAuth {
            credentials,
            production: config.is_production(),
        }
    }

    #[cfg(test)]
    pub fn with_credentials(username: &str, password: &str) -> Self {
        AdminAuth {
            credentials: Some((username.to_string(), password.to_string())),
            production: false,
        }
    }

    /// Decide whether the request's `Authorization` header grants access.
    pub fn authorize(&self, auth_header: Option<&str>) -> Result<(), AppError> {
        let (username, password) = match &self.credentials {
            Some(pair) => pair,
            None if self.production => {
                return Err(AppError::Config(
                    "Admin credentials are not configured".to_string(),
                ));
            }
            None => return Ok(()),
        };

        let header = auth_header
            .ok_or_else(|| AppError::Unauthorized("Admin authentication required".to_string()))?;
        let encoded = header
            .strip_prefix("Basic ")
            .ok_or_else(|| AppError::Unauthorized("Admin authentication required".to_string()))?;
        let decoded = BASE64
            .decode(encoded.trim())
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or_else(|| AppError::Unauthorized("Admin authentication required".to_string()))?;
        let (given_user, given_pass) = decoded
            .split_once(':')
            .ok_or_else(|| AppError::Unauthorized("Admin authentication required".to_string()))?;

        // Evaluate both comparisons so a wrong username does not return early.
        let user_ok = secure_compare(given_user, username);
        let pass_ok = secure_compare(given_pass, password);
        if user_ok && pass_ok {
            Ok(())
        } else {
            Err(AppError::Unauthorized(
                "Admin authentication required".to_string(),
            ))
        }
    }
}

pub async fn admin_auth_middleware(
    State(auth): State<Arc<AdminAuth>>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth.authorize(header) {
        Ok(()) => next.run(request).await,
        Err(error) => {
            let unauthorized = matches!(error, AppError::Unauthorized(_));
            let mut response = HttpAppError(error).into_response();
            if unauthorized {
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(AUTH_CHALLENGE),
                );
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{user}:{pass}")))
    }

    #[test]
    fn valid_credentials_pass() {
        let auth = AdminAuth::with_credentials("admin", "s3cret");
        assert!(auth.authorize(Some(&basic("admin", "s3cret"))).is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let auth = AdminAuth::with_credentials("admin", "s3cret");
        let err = auth.authorize(Some(&basic("admin", "nope"))).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn missing_and_malformed_headers_are_rejected() {
        let auth = AdminAuth::with_credentials("admin", "s3cret");
        assert!(auth.authorize(None).is_err());
        assert!(auth.authorize(Some("Bearer token")).is_err());
        assert!(auth.authorize(Some("Basic not-base64!!")).is_err());
        assert!(
            auth.authorize(Some(&format!("Basic {}", BASE64.encode("no-colon"))))
                .is_err()
        );
    }

    #[test]
    fn unconfigured_allows_in_development() {
        let auth = AdminAuth {
            credentials: None,
            production: false,
        };
        assert!(auth.authorize(None).is_ok());
    }

    #[test]
    fn unconfigured_refuses_in_production() {
        let auth = AdminAuth {
            credentials: None,
            production: true,
        };
        let err = auth.authorize(Some(&basic("admin", "s3cret"))).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
