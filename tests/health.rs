//! Health and readiness probe tests.

mod common;

use common::create_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_healthz_is_always_ok() {
    let app = create_test_app().await;

    let response = app.server.get("/healthz").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_readyz_reports_metadata_and_storage_checks() {
    let app = create_test_app().await;

    let response = app.server.get("/readyz").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["checks"]["metadata"]["ok"], true);
    assert_eq!(body["checks"]["storage"]["ok"], true);
}
