//! Admin endpoint integration tests: Basic auth, listing, CSV export.
//!
//! Run with: `cargo test -p leadgate-api --test admin_test`

mod helpers;

use helpers::{
    basic_auth, setup_test_app, valid_submission, TEST_ADMIN_PASSWORD, TEST_ADMIN_USER,
};
use serde_json::Value;

#[tokio::test]
async fn admin_list_requires_credentials() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/admin/submissions").await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(
        response
            .maybe_header("WWW-Authenticate")
            .and_then(|v| v.to_str().map(|s| s.to_string()).ok())
            .as_deref(),
        Some("Basic realm=\"Admin Dashboard\"")
    );

    let body: Value = response.json();
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["message"], "Admin authentication required");
}

#[tokio::test]
async fn admin_list_rejects_wrong_password() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/api/admin/submissions")
        .add_header("Authorization", basic_auth(TEST_ADMIN_USER, "wrong"))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn admin_list_returns_submissions_newest_first() {
    let app = setup_test_app().await;

    let mut names = Vec::new();
    for name in ["First", "Second", "Third"] {
        let mut payload = valid_submission();
        payload["name"] = Value::from(name);
        let response = app.client().post("/api/submit").json(&payload).await;
        assert_eq!(response.status_code(), 200);
        names.push(name);
    }

    let response = app
        .client()
        .get("/api/admin/submissions")
        .add_header(
            "Authorization",
            basic_auth(TEST_ADMIN_USER, TEST_ADMIN_PASSWORD),
        )
        .await;
    assert_eq!(response.status_code(), 200);

    let listed: Vec<Value> = response.json();
    assert_eq!(listed.len(), 3);
    // newest first reverses submission order
    assert_eq!(listed[0]["name"], "Third");
    assert_eq!(listed[2]["name"], "First");
    for entry in &listed {
        assert!(entry["blobUrl"].as_str().is_some());
        assert!(entry["blobSize"].as_u64().is_some());
        assert!(entry["id"].as_str().is_some());
    }
}

#[tokio::test]
async fn csv_export_renders_header_and_quoted_fields() {
    let app = setup_test_app().await;

    let mut payload = valid_submission();
    payload["brandName"] = Value::from("Co, \"The\" Brand");
    let response = app.client().post("/api/submit").json(&payload).await;
    assert_eq!(response.status_code(), 200);

    let second = app.client().post("/api/submit").json(&valid_submission()).await;
    assert_eq!(second.status_code(), 200);

    let export = app
        .client()
        .get("/api/admin/export-csv")
        .add_header(
            "Authorization",
            basic_auth(TEST_ADMIN_USER, TEST_ADMIN_PASSWORD),
        )
        .await;
    assert_eq!(export.status_code(), 200);
    assert!(export
        .maybe_header("Content-Type")
        .and_then(|v| v.to_str().map(|s| s.to_string()).ok())
        .expect("content type")
        .starts_with("text/csv"));
    let disposition = export
        .maybe_header("Content-Disposition")
        .and_then(|v| v.to_str().map(|s| s.to_string()).ok())
        .expect("disposition");
    assert!(disposition.starts_with("attachment; filename=\"submissions-"));
    assert!(disposition.ends_with(".csv\""));

    let text = export.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3, "header plus two rows");
    assert!(lines[0].starts_with("Submission ID,Timestamp,"));
    assert!(text.contains("\"Co, \"\"The\"\" Brand\""));
}

#[tokio::test]
async fn csv_export_requires_credentials() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/admin/export-csv").await;
    assert_eq!(response.status_code(), 401);
}
