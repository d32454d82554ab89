pub mod admin_submissions;
pub mod chat;
pub mod export_csv;
pub mod health;
pub mod submit;
pub mod upload;
