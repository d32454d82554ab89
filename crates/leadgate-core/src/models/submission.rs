//! Submission model
//!
//! A `Submission` is one validated, persisted lead-intake record. The JSON
//! encoding is camelCase and omits absent optional fields so the stored blob
//! matches the inbound form payload plus `id`/`timestamp`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Fixed set of selectable struggle tags. `struggles` must hold 1-3 of these.
pub const STRUGGLE_TAGS: [&str; 7] = [
    "branding-scattered",
    "story-articulation",
    "wrong-audience",
    "visuals-dont-feel-me",
    "automation-systems",
    "prioritization",
    "overwhelmed",
];

/// Fixed set of communication channel tags.
pub const COMMUNICATION_PREFERENCES: [&str; 6] =
    ["email", "text", "slack", "voice-note", "phone", "carrier-pigeon"];

/// Reference to a separately-uploaded blob, linked by URL only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub url: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
}

/// The raw form fields of a submission, before and after sanitization.
///
/// Every field is optional at this level; the validator decides which are
/// required. Unknown fields in the inbound JSON are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_presence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_now: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_metrics: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub struggles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_struggle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoidances: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aesthetic_references: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offering: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_provision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dream_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileAttachment>,
}

/// One persisted lead-intake record. `id` and `timestamp` are set exactly
/// once at creation and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: SubmissionPayload,
}

impl Submission {
    /// Generate a fresh (id, timestamp) pair from the current time. The id is
    /// the ISO-8601 timestamp with `:` and `.` replaced by `-` so it is safe
    /// as an object-store key segment.
    pub fn generate_identity() -> (String, String) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let id = timestamp.replace([':', '.'], "-");
        (id, timestamp)
    }

    pub fn new(fields: SubmissionPayload) -> Self {
        let (id, timestamp) = Self::generate_identity();
        Submission {
            id,
            timestamp,
            fields,
        }
    }
}

/// A submission as returned by the admin listing: the stored record plus the
/// object-store metadata of its blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    #[serde(flatten)]
    pub submission: Submission,
    pub blob_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_uploaded_at: Option<String>,
}
