//! Configuration module
//!
//! Environment-driven configuration for the intake backend. `Config::from_env`
//! reads every setting once at startup; accessor methods keep call sites
//! independent of the underlying layout.

use std::env;

use anyhow::Context;

// Defaults
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT_WINDOW_MINUTES: u64 = 15;
const DEFAULT_RATE_LIMIT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_CHAT_RATE_LIMIT_WINDOW_SECONDS: u64 = 60;
const DEFAULT_CHAT_RATE_LIMIT_MAX_ATTEMPTS: u32 = 20;
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 50 * 1024 * 1024;
const DEFAULT_ALLOWED_FILE_TYPES: &str = "pdf,doc,docx,txt,jpg,jpeg,png,gif,zip";

/// Which object-store backend persists submissions and uploads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Local filesystem, for development and tests
    Local,
    /// Token-authenticated HTTP blob service
    Http,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "local" => Some(StorageBackend::Local),
            "http" | "blob" => Some(StorageBackend::Http),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct IntakeConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origin: Option<String>,
    // Object store
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub blob_api_url: Option<String>,
    pub blob_read_write_token: Option<String>,
    // Admin authentication
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    // Email notifications
    pub email_notifications_enabled: bool,
    pub email_from: String,
    pub email_to: String,
    pub resend_api_key: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_tls: bool,
    // Rate limiting
    pub rate_limit_window_minutes: u64,
    pub rate_limit_max_attempts: u32,
    pub chat_rate_limit_window_seconds: u64,
    pub chat_rate_limit_max_attempts: u32,
    // File uploads
    pub file_upload_enabled: bool,
    pub max_file_size_bytes: usize,
    pub allowed_file_types: Vec<String>,
    // Chat providers
    pub openrouter_api_key: Option<String>,
    pub groq_api_key: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(Box<IntakeConfig>);

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env_opt(key) {
        Some(v) => !v.eq_ignore_ascii_case("false"),
        None => default,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match env_opt(key) {
        Some(v) => v
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", key, v)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Best-effort .env loading; absence is fine in production
        let _ = dotenvy::dotenv();

        let storage_backend_raw = env_or("STORAGE_BACKEND", "local");
        let storage_backend = StorageBackend::parse(&storage_backend_raw)
            .with_context(|| format!("Unknown STORAGE_BACKEND: {}", storage_backend_raw))?;

        let allowed_file_types = env_or("ALLOWED_FILE_TYPES", DEFAULT_ALLOWED_FILE_TYPES)
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(Config(Box::new(IntakeConfig {
            server_port: env_parse("PORT", DEFAULT_SERVER_PORT)?,
            environment: env_or("ENVIRONMENT", "development"),
            cors_origin: env_opt("CORS_ORIGIN"),
            storage_backend,
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            blob_api_url: env_opt("BLOB_API_URL"),
            blob_read_write_token: env_opt("BLOB_READ_WRITE_TOKEN"),
            admin_username: env_opt("ADMIN_USERNAME"),
            admin_password: env_opt("ADMIN_PASSWORD"),
            email_notifications_enabled: env_bool("ENABLE_EMAIL_NOTIFICATIONS", true),
            email_from: env_or("EMAIL_FROM", "hello@hommemade.xyz"),
            email_to: env_or("EMAIL_TO", "hello@hommemade.xyz"),
            resend_api_key: env_opt("RESEND_API_KEY"),
            smtp_host: env_opt("SMTP_HOST"),
            smtp_port: env_opt("SMTP_PORT").and_then(|v| v.parse().ok()),
            smtp_user: env_opt("SMTP_USER"),
            smtp_password: env_opt("SMTP_PASSWORD"),
            smtp_tls: env_bool("SMTP_TLS", true),
            rate_limit_window_minutes: env_parse(
                "RATE_LIMIT_WINDOW_MINUTES",
                DEFAULT_RATE_LIMIT_WINDOW_MINUTES,
            )?,
            rate_limit_max_attempts: env_parse(
                "RATE_LIMIT_MAX_ATTEMPTS",
                DEFAULT_RATE_LIMIT_MAX_ATTEMPTS,
            )?,
            chat_rate_limit_window_seconds: env_parse(
                "CHAT_RATE_LIMIT_WINDOW_SECONDS",
                DEFAULT_CHAT_RATE_LIMIT_WINDOW_SECONDS,
            )?,
            chat_rate_limit_max_attempts: env_parse(
                "CHAT_RATE_LIMIT_MAX_ATTEMPTS",
                DEFAULT_CHAT_RATE_LIMIT_MAX_ATTEMPTS,
            )?,
            file_upload_enabled: env_bool("ENABLE_FILE_UPLOAD", true),
            max_file_size_bytes: env_parse("MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE_BYTES)?,
            allowed_file_types,
            openrouter_api_key: env_opt("OPENROUTER_API_KEY"),
            groq_api_key: env_opt("GROQ_API_KEY"),
        })))
    }

    fn inner(&self) -> &IntakeConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn cors_origin(&self) -> Option<&str> {
        self.inner().cors_origin.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn blob_api_url(&self) -> Option<&str> {
        self.inner().blob_api_url.as_deref()
    }

    pub fn blob_read_write_token(&self) -> Option<&str> {
        self.inner().blob_read_write_token.as_deref()
    }

    pub fn admin_username(&self) -> Option<&str> {
        self.inner().admin_username.as_deref()
    }

    pub fn admin_password(&self) -> Option<&str> {
        self.inner().admin_password.as_deref()
    }

    pub fn admin_auth_configured(&self) -> bool {
        self.admin_username().is_some() && self.admin_password().is_some()
    }

    pub fn email_notifications_enabled(&self) -> bool {
        self.inner().email_notifications_enabled
    }

    pub fn email_from(&self) -> &str {
        &self.inner().email_from
    }

    pub fn email_to(&self) -> &str {
        &self.inner().email_to
    }

    pub fn resend_api_key(&self) -> Option<&str> {
        self.inner().resend_api_key.as_deref()
    }

    pub fn smtp_host(&self) -> Option<&str> {
        self.inner().smtp_host.as_deref()
    }

    pub fn smtp_port(&self) -> Option<u16> {
        self.inner().smtp_port
    }

    pub fn smtp_user(&self) -> Option<&str> {
        self.inner().smtp_user.as_deref()
    }

    pub fn smtp_password(&self) -> Option<&str> {
        self.inner().smtp_password.as_deref()
    }

    pub fn smtp_tls(&self) -> bool {
        self.inner().smtp_tls
    }

    pub fn rate_limit_window_ms(&self) -> u64 {
        self.inner().rate_limit_window_minutes * 60 * 1000
    }

    pub fn rate_limit_max_attempts(&self) -> u32 {
        self.inner().rate_limit_max_attempts
    }

    pub fn chat_rate_limit_window_ms(&self) -> u64 {
        self.inner().chat_rate_limit_window_seconds * 1000
    }

    pub fn chat_rate_limit_max_attempts(&self) -> u32 {
        self.inner().chat_rate_limit_max_attempts
    }

    pub fn file_upload_enabled(&self) -> bool {
        self.inner().file_upload_enabled
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn allowed_file_types(&self) -> &[String] {
        &self.inner().allowed_file_types
    }

    pub fn openrouter_api_key(&self) -> Option<&str> {
        self.inner().openrouter_api_key.as_deref()
    }

    pub fn groq_api_key(&self) -> Option<&str> {
        self.inner().groq_api_key.as_deref()
    }

    /// Summary for startup logging, without secrets.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "environment": self.environment(),
            "storageBackend": format!("{:?}", self.storage_backend()),
            "emailEnabled": self.email_notifications_enabled(),
            "fileUploadEnabled": self.file_upload_enabled(),
            "hasAdminAuth": self.admin_auth_configured(),
            "hasEmailConfig": self.resend_api_key().is_some() || self.smtp_host().is_some(),
            "hasBlobToken": self.blob_read_write_token().is_some(),
        })
    }
}
