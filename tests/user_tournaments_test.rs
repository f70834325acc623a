use serde_json::{json, Value};

mod common;
use common::firestore_helpers::{
    collection_path, document_path, documents_base, firestore_doc, run_query_path,
    run_query_response, tournament_fields,
};
use common::utils::{spawn_app_with, TestAppOptions, ALICE, ALICE_TOKEN, BOB_TOKEN};

#[tokio::test]
async fn user_routes_require_a_valid_token() {
    let app = spawn_app_with(TestAppOptions::default()).await;

    let response = app.get("/v1/user/tournaments").await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app.get_auth("/v1/user/tournaments", "bogus-token").await;
    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn create_rejects_missing_required_fields() {
    let app = spawn_app_with(TestAppOptions::default()).await;

    let response = app
        .post_json(
            "/v1/user/tournaments",
            &json!({ "name": "City League" }),
            ALICE_TOKEN,
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("game"));
    assert!(error.contains("format"));
    assert!(error.contains("date"));
    assert!(!error.contains("name"));
}

#[tokio::test]
async fn create_stores_the_tournament_for_the_caller() {
    let mut firestore = mockito::Server::new_async().await;
    let create = firestore
        .mock("POST", collection_path("user_tournaments").as_str())
        .match_query(mockito::Matcher::Any)
        .match_body(mockito::Matcher::PartialJson(json!({
            "fields": { "userId": { "stringValue": ALICE } }
        })))
        .with_status(200)
        .with_body(
            firestore_doc("user_tournaments", "ut-1", &tournament_fields(ALICE)).to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        firestore_base_url: documents_base(&firestore),
        ..Default::default()
    })
    .await;

    let response = app
        .post_json(
            "/v1/user/tournaments",
            &json!({
                "game": "pokemon",
                "name": "City League",
                "format": "standard",
                "date": "2026-07-20",
            }),
            ALICE_TOKEN,
        )
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], "ut-1");
    assert_eq!(body["userId"], ALICE);
    assert_eq!(body["name"], "City League");
    create.assert_async().await;
}

#[tokio::test]
async fn list_returns_owned_tournaments_newest_first() {
    let mut firestore = mockito::Server::new_async().await;
    let mut older = tournament_fields(ALICE);
    older["date"] = json!("2026-07-10");
    older["name"] = json!("Older Cup");
    let newer = tournament_fields(ALICE);
    let _query = firestore
        .mock("POST", run_query_path().as_str())
        .match_query(mockito::Matcher::Any)
        .match_body(mockito::Matcher::PartialJson(json!({
            "structuredQuery": { "from": [{ "collectionId": "user_tournaments" }] }
        })))
        .with_status(200)
        .with_body(
            run_query_response(&[
                firestore_doc("user_tournaments", "ut-old", &older),
                firestore_doc("user_tournaments", "ut-new", &newer),
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        firestore_base_url: documents_base(&firestore),
        ..Default::default()
    })
    .await;

    let response = app.get_auth("/v1/user/tournaments", ALICE_TOKEN).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["count"], 2);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["tournaments"][0]["id"], "ut-new");
    assert_eq!(body["tournaments"][1]["id"], "ut-old");
}

#[tokio::test]
async fn update_by_another_user_is_403() {
    let mut firestore = mockito::Server::new_async().await;
    let _get = firestore
        .mock("GET", document_path("user_tournaments", "ut-1").as_str())
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            firestore_doc("user_tournaments", "ut-1", &tournament_fields(ALICE)).to_string(),
        )
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        firestore_base_url: documents_base(&firestore),
        ..Default::default()
    })
    .await;

    let response = app
        .put_json(
            "/v1/user/tournaments/ut-1",
            &json!({ "name": "Hijacked" }),
            BOB_TOKEN,
        )
        .await;
    assert_eq!(response.status().as_u16(), 403);

    let response = app.delete("/v1/user/tournaments/ut-1", BOB_TOKEN).await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn update_of_missing_tournament_is_404() {
    let mut firestore = mockito::Server::new_async().await;
    let _get = firestore
        .mock("GET", document_path("user_tournaments", "gone").as_str())
        .match_query(mockito::Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        firestore_base_url: documents_base(&firestore),
        ..Default::default()
    })
    .await;

    let response = app
        .put_json("/v1/user/tournaments/gone", &json!({}), ALICE_TOKEN)
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn update_applies_changes_and_keeps_immutable_fields() {
    let mut firestore = mockito::Server::new_async().await;
    let _get = firestore
        .mock("GET", document_path("user_tournaments", "ut-1").as_str())
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            firestore_doc("user_tournaments", "ut-1", &tournament_fields(ALICE)).to_string(),
        )
        .create_async()
        .await;
    let patch = firestore
        .mock("PATCH", document_path("user_tournaments", "ut-1").as_str())
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            firestore_doc("user_tournaments", "ut-1", &tournament_fields(ALICE)).to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        firestore_base_url: documents_base(&firestore),
        ..Default::default()
    })
    .await;

    let response = app
        .put_json(
            "/v1/user/tournaments/ut-1",
            &json!({ "name": "Renamed Cup", "notes": "great run" }),
            ALICE_TOKEN,
        )
        .await;

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Renamed Cup");
    assert_eq!(body["notes"], "great run");
    assert_eq!(body["userId"], ALICE);
    assert_eq!(body["createdAt"], "2026-07-20T10:00:00Z");
    assert_ne!(body["updatedAt"], "2026-07-20T10:00:00Z");
    patch.assert_async().await;
}

#[tokio::test]
async fn delete_removes_the_tournament_and_its_matches() {
    let mut firestore = mockito::Server::new_async().await;
    let _get = firestore
        .mock("GET", document_path("user_tournaments", "ut-1").as_str())
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            firestore_doc("user_tournaments", "ut-1", &tournament_fields(ALICE)).to_string(),
        )
        .create_async()
        .await;
    let delete_tournament = firestore
        .mock("DELETE", document_path("user_tournaments", "ut-1").as_str())
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let match_doc = firestore_doc(
        "user_matches",
        "m-1",
        &common::firestore_helpers::match_fields(ALICE, "ut-1", 1, "win"),
    );
    let _query = firestore
        .mock("POST", run_query_path().as_str())
        .match_query(mockito::Matcher::Any)
        .match_body(mockito::Matcher::PartialJson(json!({
            "structuredQuery": { "from": [{ "collectionId": "user_matches" }] }
        })))
        .with_status(200)
        .with_body(run_query_response(&[match_doc]).to_string())
        .create_async()
        .await;
    let delete_match = firestore
        .mock("DELETE", document_path("user_matches", "m-1").as_str())
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let app = spawn_app_with(TestAppOptions {
        firestore_base_url: documents_base(&firestore),
        ..Default::default()
    })
    .await;

    let response = app.delete("/v1/user/tournaments/ut-1", ALICE_TOKEN).await;
    assert_eq!(response.status().as_u16(), 204);
    delete_tournament.assert_async().await;
    delete_match.assert_async().await;
}

#[tokio::test]
async fn wrong_method_on_user_resource_is_405_with_allow() {
    let app = spawn_app_with(TestAppOptions::default()).await;

    let response = app
        .api_client
        .patch(format!("{}/v1/user/tournaments", app.address))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status().as_u16(), 405);
    assert_eq!(
        response.headers().get("Allow").and_then(|v| v.to_str().ok()),
        Some("GET, POST")
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Method not allowed");
}
