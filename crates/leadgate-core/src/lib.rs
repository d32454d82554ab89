//! Core types for the leadgate intake backend: configuration, the error
//! taxonomy, domain models, and the pure validation/sanitization pass.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

pub use config::{Config, StorageBackend};
pub use error::{AppError, ErrorMetadata, FieldErrors, LogLevel};
