//! Payload sanitization
//!
//! Trims whitespace and strips literal `<`/`>` characters from every known
//! text field. This is a minimal XSS mitigation, not HTML sanitization: the
//! admin dashboard and the notification email render these values, and the
//! stored blob should never carry raw angle brackets. Fields absent from the
//! input stay absent; nothing is defaulted here.

use crate::models::submission::{FileAttachment, SubmissionPayload};

/// Trim and strip `<`/`>` from a single text value.
pub fn clean_text(text: &str) -> String {
    text.trim().replace(['<', '>'], "")
}

fn clean_opt(value: &Option<String>) -> Option<String> {
    value.as_deref().map(clean_text)
}

/// Produce a cleaned copy of the payload. Idempotent:
/// `sanitize_payload(&sanitize_payload(p)) == sanitize_payload(p)`.
pub fn sanitize_payload(payload: &SubmissionPayload) -> SubmissionPayload {
    SubmissionPayload {
        name: clean_opt(&payload.name),
        email: clean_opt(&payload.email),
        phone: clean_opt(&payload.phone),
        brand_name: clean_opt(&payload.brand_name),
        industry: clean_opt(&payload.industry),
        online_presence: clean_opt(&payload.online_presence),
        why_now: clean_opt(&payload.why_now),
        success_metrics: clean_opt(&payload.success_metrics),
        struggles: payload.struggles.iter().map(|s| clean_text(s)).collect(),
        other_struggle: clean_opt(&payload.other_struggle),
        brand_voice: clean_opt(&payload.brand_voice),
        brand_tone: clean_opt(&payload.brand_tone),
        avoidances: clean_opt(&payload.avoidances),
        aesthetic_references: clean_opt(&payload.aesthetic_references),
        offering: clean_opt(&payload.offering),
        value_provision: clean_opt(&payload.value_provision),
        dream_audience: clean_opt(&payload.dream_audience),
        feedback: clean_opt(&payload.feedback),
        communication: clean_opt(&payload.communication),
        additional_info: clean_opt(&payload.additional_info),
        // size and uploadedAt pass through unchanged
        files: payload
            .files
            .iter()
            .map(|f| FileAttachment {
                url: clean_text(&f.url),
                file_name: clean_text(&f.file_name),
                size: f.size,
                uploaded_at: f.uploaded_at.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_angle_brackets_and_trims() {
        assert_eq!(clean_text("  <script>alert(1)</script>  "), "scriptalert(1)/script");
        assert_eq!(clean_text("plain text"), "plain text");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let payload = SubmissionPayload {
            name: Some("  <b>Ana</b> ".to_string()),
            email: Some(" a@b.com ".to_string()),
            struggles: vec![" <overwhelmed> ".to_string()],
            files: vec![FileAttachment {
                url: " https://x/<y>.pdf ".to_string(),
                file_name: "<y>.pdf".to_string(),
                size: Some(42),
                uploaded_at: Some("2026-01-01T00:00:00Z".to_string()),
            }],
            ..Default::default()
        };
        let once = sanitize_payload(&payload);
        let twice = sanitize_payload(&once);
        assert_eq!(once, twice);
        assert_eq!(once.name.as_deref(), Some("bAna/b"));
        assert_eq!(once.struggles[0], "overwhelmed");
        assert_eq!(once.files[0].size, Some(42));
    }

    #[test]
    fn absent_fields_remain_absent() {
        let cleaned = sanitize_payload(&SubmissionPayload::default());
        assert!(cleaned.name.is_none());
        assert!(cleaned.files.is_empty());
        assert!(cleaned.struggles.is_empty());
    }
}
