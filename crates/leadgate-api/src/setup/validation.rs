//! Startup configuration validation
//!
//! Catches misconfigurations at boot instead of at request time, except
//! where graceful degradation is the documented behavior (missing admin
//! credentials outside production, missing email provider).

use anyhow::Result;
use leadgate_core::{Config, StorageBackend};

pub fn validate_config(config: &Config) -> Result<()> {
    let is_production = config.is_production();

    match config.storage_backend() {
        StorageBackend::Local => {
            if config.local_storage_path().is_none() {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH"
                ));
            }
        }
        StorageBackend::Http => {
            if config.blob_api_url().is_none() || config.blob_read_write_token().is_none() {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=http requires BLOB_API_URL and BLOB_READ_WRITE_TOKEN"
                ));
            }
        }
    }

    // Not fatal: admin routes refuse access at request time when credentials
    // are missing in production.
    if is_production && !config.admin_auth_configured() {
        tracing::warn!(
            "ADMIN_USERNAME/ADMIN_PASSWORD not set in production; admin endpoints will refuse access"
        );
    }

    if config.email_notifications_enabled()
        && config.resend_api_key().is_none()
        && config.smtp_host().is_none()
    {
        tracing::warn!(
            "Email notifications enabled but neither RESEND_API_KEY nor SMTP_HOST is set; \
             notification delivery will fail"
        );
    }

    if config.openrouter_api_key().is_none() && config.groq_api_key().is_none() {
        tracing::warn!("No chat provider keys set; /api/chat will return configuration errors");
    }

    if config.rate_limit_max_attempts() == 0 || config.chat_rate_limit_max_attempts() == 0 {
        return Err(anyhow::anyhow!("Rate limit max attempts cannot be 0"));
    }

    Ok(())
}
