//! Domain models

pub mod chat;
pub mod submission;

pub use chat::{ChatMessage, ChatRequest, ChatResponse};
pub use submission::{
    FileAttachment, StoredSubmission, Submission, SubmissionPayload, COMMUNICATION_PREFERENCES,
    STRUGGLE_TAGS,
};
