//! Form validation
//!
//! `validate_payload` checks every field rule independently and collects all
//! violations in one pass, so a client can render every problem at once. It
//! never fails early and never panics.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::FieldErrors;
use crate::models::submission::{
    SubmissionPayload, COMMUNICATION_PREFERENCES, STRUGGLE_TAGS,
};

/// Outcome of a validation pass: a field name is present in `errors` exactly
/// when that field failed.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: FieldErrors,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Simple local@domain.tld shape, intentionally not full RFC 5322
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d\s\-\+\(\)\.]+$").expect("valid phone regex"))
}

fn is_valid_string(value: Option<&str>, min_len: usize, max_len: usize) -> bool {
    match value {
        Some(v) => {
            let trimmed = v.trim();
            trimmed.chars().count() >= min_len && trimmed.chars().count() <= max_len
        }
        None => min_len == 0,
    }
}

fn is_valid_email(value: Option<&str>) -> bool {
    value.is_some_and(|v| email_regex().is_match(v.trim()))
}

/// Phone is optional; when present it may only contain digits, spaces and
/// `-+().`, and must carry at least 10 digits.
fn is_valid_phone(value: &str) -> bool {
    phone_regex().is_match(value) && value.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

fn is_valid_struggles(struggles: &[String]) -> bool {
    !struggles.is_empty()
        && struggles.len() <= 3
        && struggles.iter().all(|s| STRUGGLE_TAGS.contains(&s.as_str()))
}

fn is_valid_communication(value: Option<&str>) -> bool {
    value.is_some_and(|v| COMMUNICATION_PREFERENCES.contains(&v))
}

/// Validate the complete form payload against the field rules. Returns a
/// report with one message per failing field; an empty map means valid.
pub fn validate_payload(payload: &SubmissionPayload) -> ValidationReport {
    let mut errors = FieldErrors::new();

    // Required fields
    if !is_valid_string(payload.name.as_deref(), 1, 100) {
        errors.insert(
            "name".to_string(),
            "Name is required and must be between 1-100 characters".to_string(),
        );
    }
    if !is_valid_email(payload.email.as_deref()) {
        errors.insert(
            "email".to_string(),
            "Valid email address is required".to_string(),
        );
    }
    if !is_valid_string(payload.brand_name.as_deref(), 1, 100) {
        errors.insert(
            "brandName".to_string(),
            "Brand name is required and must be between 1-100 characters".to_string(),
        );
    }
    if !is_valid_string(payload.why_now.as_deref(), 1, 2000) {
        errors.insert(
            "whyNow".to_string(),
            "Please tell us why now (1-2000 characters)".to_string(),
        );
    }
    if !is_valid_string(payload.success_metrics.as_deref(), 1, 2000) {
        errors.insert(
            "successMetrics".to_string(),
            "Success metrics are required (1-2000 characters)".to_string(),
        );
    }
    if !is_valid_struggles(&payload.struggles) {
        errors.insert(
            "struggles".to_string(),
            "Please select 1-3 struggles".to_string(),
        );
    }
    if !is_valid_communication(payload.communication.as_deref()) {
        errors.insert(
            "communication".to_string(),
            "Please select a communication preference".to_string(),
        );
    }

    // Optional fields: only checked when present
    if let Some(phone) = payload.phone.as_deref() {
        if !is_valid_phone(phone) {
            errors.insert(
                "phone".to_string(),
                "Please enter a valid phone number".to_string(),
            );
        }
    }

    let optional_bounds: [(&str, Option<&str>, usize, &str); 12] = [
        (
            "industry",
            payload.industry.as_deref(),
            100,
            "Industry must be less than 100 characters",
        ),
        (
            "onlinePresence",
            payload.online_presence.as_deref(),
            1000,
            "Online presence must be less than 1000 characters",
        ),
        (
            "brandVoice",
            payload.brand_voice.as_deref(),
            200,
            "Brand voice must be less than 200 characters",
        ),
        (
            "brandTone",
            payload.brand_tone.as_deref(),
            200,
            "Brand tone must be less than 200 characters",
        ),
        (
            "avoidances",
            payload.avoidances.as_deref(),
            1000,
            "Avoidances must be less than 1000 characters",
        ),
        (
            "aestheticReferences",
            payload.aesthetic_references.as_deref(),
            1000,
            "Aesthetic references must be less than 1000 characters",
        ),
        (
            "offering",
            payload.offering.as_deref(),
            1000,
            "Offering description must be less than 1000 characters",
        ),
        (
            "valueProvision",
            payload.value_provision.as_deref(),
            1000,
            "Value provision must be less than 1000 characters",
        ),
        (
            "dreamAudience",
            payload.dream_audience.as_deref(),
            1000,
            "Dream audience must be less than 1000 characters",
        ),
        (
            "feedback",
            payload.feedback.as_deref(),
            1000,
            "Feedback must be less than 1000 characters",
        ),
        (
            "additionalInfo",
            payload.additional_info.as_deref(),
            1000,
            "Additional info must be less than 1000 characters",
        ),
        (
            "otherStruggle",
            payload.other_struggle.as_deref(),
            200,
            "Other struggle must be less than 200 characters",
        ),
    ];

    for (field, value, max_len, message) in optional_bounds {
        if value.is_some() && !is_valid_string(value, 0, max_len) {
            errors.insert(field.to_string(), message.to_string());
        }
    }

    ValidationReport { errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid() -> SubmissionPayload {
        SubmissionPayload {
            name: Some("Ana".to_string()),
            email: Some("a@b.com".to_string()),
            brand_name: Some("Ana Co".to_string()),
            why_now: Some("The time is right".to_string()),
            success_metrics: Some("More leads".to_string()),
            struggles: vec!["overwhelmed".to_string()],
            communication: Some("email".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_valid_payload_passes() {
        let report = validate_payload(&minimal_valid());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let report = validate_payload(&SubmissionPayload::default());
        assert!(!report.is_valid());
        for field in [
            "name",
            "email",
            "brandName",
            "whyNow",
            "successMetrics",
            "struggles",
            "communication",
        ] {
            assert!(report.errors.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn first_failure_does_not_suppress_later_errors() {
        let mut payload = minimal_valid();
        payload.name = None;
        payload.email = Some("not-an-email".to_string());
        let report = validate_payload(&payload);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.contains_key("name"));
        assert!(report.errors.contains_key("email"));
    }

    #[test]
    fn email_shape_is_enforced() {
        for bad in ["plain", "a@b", "a b@c.com", "@c.com", "a@.com "] {
            let mut payload = minimal_valid();
            payload.email = Some(bad.to_string());
            assert!(
                validate_payload(&payload).errors.contains_key("email"),
                "expected {bad:?} to be rejected"
            );
        }
        let mut payload = minimal_valid();
        payload.email = Some("first.last@sub.example.co".to_string());
        assert!(validate_payload(&payload).is_valid());
    }

    #[test]
    fn struggles_cardinality_and_membership() {
        let cases: [(Vec<&str>, bool); 5] = [
            (vec![], false),
            (vec!["overwhelmed"], true),
            (
                vec!["overwhelmed", "prioritization", "wrong-audience"],
                true,
            ),
            (
                vec![
                    "overwhelmed",
                    "prioritization",
                    "wrong-audience",
                    "automation-systems",
                ],
                false,
            ),
            (vec!["not-a-tag"], false),
        ];
        for (struggles, expected_valid) in cases {
            let mut payload = minimal_valid();
            payload.struggles = struggles.iter().map(|s| s.to_string()).collect();
            let report = validate_payload(&payload);
            assert_eq!(
                !report.errors.contains_key("struggles"),
                expected_valid,
                "struggles {struggles:?}"
            );
        }
    }

    #[test]
    fn communication_must_be_a_known_channel() {
        let mut payload = minimal_valid();
        payload.communication = Some("fax".to_string());
        assert!(validate_payload(&payload)
            .errors
            .contains_key("communication"));

        payload.communication = Some("carrier-pigeon".to_string());
        assert!(validate_payload(&payload).is_valid());
    }

    #[test]
    fn phone_is_optional_but_checked_when_present() {
        let mut payload = minimal_valid();
        assert!(validate_payload(&payload).is_valid());

        payload.phone = Some("call me".to_string());
        assert!(validate_payload(&payload).errors.contains_key("phone"));

        payload.phone = Some("123456789".to_string()); // only 9 digits
        assert!(validate_payload(&payload).errors.contains_key("phone"));

        payload.phone = Some("+1 (555) 123-4567".to_string());
        assert!(validate_payload(&payload).is_valid());
    }

    #[test]
    fn optional_field_length_limits_apply() {
        let mut payload = minimal_valid();
        payload.brand_voice = Some("x".repeat(201));
        payload.industry = Some("y".repeat(101));
        let report = validate_payload(&payload);
        assert!(report.errors.contains_key("brandVoice"));
        assert!(report.errors.contains_key("industry"));

        let mut payload = minimal_valid();
        payload.brand_voice = Some("warm and direct".to_string());
        assert!(validate_payload(&payload).is_valid());
    }

    #[test]
    fn whitespace_only_required_field_is_rejected() {
        let mut payload = minimal_valid();
        payload.name = Some("   ".to_string());
        assert!(validate_payload(&payload).errors.contains_key("name"));
    }
}
