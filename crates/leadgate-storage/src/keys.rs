//! Storage key layout.

/// Prefix under which submission documents are stored.
pub const SUBMISSIONS_PREFIX: &str = "submissions/";

/// Prefix under which uploaded attachments are stored.
pub const UPLOADS_PREFIX: &str = "uploads/";

/// Key of the JSON document for one submission.
pub fn submission_key(id: &str) -> String {
    format!("{}{}.json", SUBMISSIONS_PREFIX, id)
}

/// Key of an uploaded attachment, namespaced by the submission it belongs to.
pub fn upload_key(submission_id: &str, file_name: &str) -> String {
    format!("{}{}-{}", UPLOADS_PREFIX, submission_id, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_key_layout() {
        assert_eq!(
            submission_key("2026-08-30T12-00-00-000Z"),
            "submissions/2026-08-30T12-00-00-000Z.json"
        );
    }

    #[test]
    fn upload_key_layout() {
        assert_eq!(upload_key("abc", "logo.png"), "uploads/abc-logo.png");
    }
}
