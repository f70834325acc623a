use serde_json::Value;

mod common;
use common::utils::{spawn_app_with, upstream_tournament, TestAppOptions};

#[tokio::test]
async fn recent_tournaments_are_reshaped_and_cached() {
    let mut upstream = mockito::Server::new_async().await;
    let tournaments = upstream
        .mock("GET", "/tournaments")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            serde_json::json!([
                upstream_tournament("t1", "Regional Lille", 1),
                upstream_tournament("t2", "City League Kyoto", 3),
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        limitless_base_url: upstream.url(),
        ..Default::default()
    })
    .await;

    let response = app.get("/v1/pokemon/tournaments/recent").await;
    assert!(response.status().is_success());
    assert_eq!(
        response.headers().get("X-Cache").and_then(|v| v.to_str().ok()),
        Some("MISS")
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["count"], 2);
    let first = &body["tournaments"][0];
    assert_eq!(first["id"], "t1");
    assert_eq!(first["name"], "Regional Lille");
    assert_eq!(first["players"], 64);
    assert_eq!(first["format"], "STANDARD");
    assert!(first["date"].is_string());

    let response = app.get("/v1/pokemon/tournaments/recent").await;
    assert_eq!(
        response.headers().get("X-Cache").and_then(|v| v.to_str().ok()),
        Some("HIT")
    );
    tournaments.assert_async().await;
}

#[tokio::test]
async fn tournaments_outside_the_window_are_dropped() {
    let mut upstream = mockito::Server::new_async().await;
    let _tournaments = upstream
        .mock("GET", "/tournaments")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            serde_json::json!([
                upstream_tournament("fresh", "This Week", 2),
                upstream_tournament("stale", "Last Month", 30),
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        limitless_base_url: upstream.url(),
        ..Default::default()
    })
    .await;

    let response = app.get("/v1/pokemon/tournaments/recent?days=7").await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["tournaments"][0]["id"], "fresh");
}

#[tokio::test]
async fn legacy_tournaments_route_defaults_to_pokemon() {
    let mut upstream = mockito::Server::new_async().await;
    let _tournaments = upstream
        .mock("GET", "/tournaments")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(serde_json::json!([upstream_tournament("t1", "Cup", 1)]).to_string())
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        limitless_base_url: upstream.url(),
        ..Default::default()
    })
    .await;

    let response = app.get("/v1/tournaments/recent").await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["count"], 1);
}
