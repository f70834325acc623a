mod common;
use common::utils::spawn_app;

#[tokio::test]
async fn health_check_reports_ok() {
    let app = spawn_app().await;

    let response = app.get("/health").await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.expect("Cannot turn into a json.");
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_endpoint_returns_404() {
    let app = spawn_app().await;

    let response = app.get("/nope").await;

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.expect("Cannot turn into a json.");
    assert_eq!(body["error"], "Endpoint not found");
}
