//! Form submission integration tests.
//!
//! Run with: `cargo test -p leadgate-api --test intake_test`

mod helpers;

use helpers::{setup_test_app, setup_test_app_with_limits, valid_submission};
use serde_json::Value;

#[tokio::test]
async fn submit_valid_form_persists_and_returns_id() {
    let app = setup_test_app().await;

    let response = app.client().post("/api/submit").json(&valid_submission()).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Form submitted successfully");

    let submission_id = body["data"]["submissionId"].as_str().expect("submissionId");
    assert!(
        submission_id
            .chars()
            .all(|c| c.is_ascii_digit() || c == 'T' || c == '-' || c == 'Z'),
        "unexpected id shape: {submission_id}"
    );
    assert!(submission_id.ends_with('Z'));
    assert!(body["data"]["timestamp"].as_str().is_some());
    assert!(body["data"]["blobUrl"].as_str().is_some());

    // the stored document is the sanitized input plus id/timestamp
    let path = app
        .storage_path()
        .join("submissions")
        .join(format!("{submission_id}.json"));
    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(path).expect("stored document"))
            .expect("stored json");
    assert_eq!(stored["id"], submission_id);
    assert_eq!(stored["name"], "Ana");
    assert_eq!(stored["email"], "a@b.com");
    assert_eq!(stored["struggles"], serde_json::json!(["overwhelmed"]));
}

#[tokio::test]
async fn submit_sanitizes_markup_in_text_fields() {
    let app = setup_test_app().await;

    let mut payload = valid_submission();
    payload["name"] = Value::from("  Ana <script>alert(1)</script>  ");

    let response = app.client().post("/api/submit").json(&payload).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let submission_id = body["data"]["submissionId"].as_str().expect("submissionId");
    let path = app
        .storage_path()
        .join("submissions")
        .join(format!("{submission_id}.json"));
    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(path).expect("stored document"))
            .expect("stored json");
    assert_eq!(stored["name"], "Ana scriptalert(1)/script");
}

#[tokio::test]
async fn submit_invalid_form_returns_all_field_errors() {
    let app = setup_test_app().await;

    // missing required fields, bad email, too many struggles
    let payload = serde_json::json!({
        "email": "not-an-email",
        "struggles": ["overwhelmed", "prioritization", "wrong-audience", "automation-systems"],
    });

    let response = app.client().post("/api/submit").json(&payload).await;
    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["message"], "Please check your form data");
    let errors = body["errors"].as_object().expect("errors map");
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("email"));
    assert!(errors.contains_key("brandName"));
    assert!(errors.contains_key("struggles"));
    assert!(errors.contains_key("communication"));

    assert_eq!(app.stored_submission_count(), 0);
}

#[tokio::test]
async fn submit_rejects_malformed_json_body() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/submit")
        .add_header("Content-Type", "application/json")
        .bytes("{not json".into())
        .await;
    assert_eq!(response.status_code(), 400);

    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid request");
}

#[tokio::test]
async fn sixth_submission_in_window_is_rate_limited() {
    let app = setup_test_app_with_limits(5, 20).await;

    for attempt in 1..=5 {
        let response = app.client().post("/api/submit").json(&valid_submission()).await;
        assert_eq!(response.status_code(), 200, "attempt {attempt} should pass");
    }

    let denied = app.client().post("/api/submit").json(&valid_submission()).await;
    assert_eq!(denied.status_code(), 429);
    assert!(denied.maybe_header("Retry-After").is_some());
    assert_eq!(
        denied
            .maybe_header("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().map(|s| s.to_string()).ok())
            .as_deref(),
        Some("0")
    );

    let body: Value = denied.json();
    assert_eq!(body["error"], "Rate limit exceeded");

    // the denied request wrote nothing
    assert_eq!(app.stored_submission_count(), 5);
}

#[tokio::test]
async fn rate_limit_headers_count_down_remaining_attempts() {
    let app = setup_test_app_with_limits(3, 20).await;

    let first = app.client().post("/api/submit").json(&valid_submission()).await;
    assert_eq!(
        first
            .maybe_header("X-RateLimit-Limit")
            .and_then(|v| v.to_str().map(|s| s.to_string()).ok())
            .as_deref(),
        Some("3")
    );
    assert_eq!(
        first
            .maybe_header("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().map(|s| s.to_string()).ok())
            .as_deref(),
        Some("2")
    );
}

#[tokio::test]
async fn rapid_submissions_get_distinct_ids() {
    let app = setup_test_app_with_limits(10, 20).await;

    let mut ids = std::collections::BTreeSet::new();
    for _ in 0..4 {
        let response = app.client().post("/api/submit").json(&valid_submission()).await;
        assert_eq!(response.status_code(), 200);
        let body: Value = response.json();
        ids.insert(body["data"]["submissionId"].as_str().expect("id").to_string());
    }
    assert_eq!(ids.len(), 4);
    assert_eq!(app.stored_submission_count(), 4);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}
