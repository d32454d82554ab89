//! Leadgate API Library
//!
//! This crate provides the HTTP API handlers, middleware, and application setup
//! for the lead-intake backend.

// Module declarations
mod handlers;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::intake::IntakePipeline;
