use serde_json::{json, Value};

use tcg_companion_backend::services::firestore::to_firestore_fields;

/// Path the mocked document store serves under; mirrors the real REST layout
/// so the client's URL building is exercised as-is.
pub const DOCUMENTS_PATH: &str = "/v1/projects/test/databases/(default)/documents";

pub fn documents_base(server: &mockito::ServerGuard) -> String {
    format!("{}{}", server.url(), DOCUMENTS_PATH)
}

pub fn collection_path(collection: &str) -> String {
    format!("{}/{}", DOCUMENTS_PATH, collection)
}

pub fn document_path(collection: &str, id: &str) -> String {
    format!("{}/{}/{}", DOCUMENTS_PATH, collection, id)
}

pub fn run_query_path() -> String {
    format!("{}:runQuery", DOCUMENTS_PATH)
}

/// A REST document as Firestore returns it.
pub fn firestore_doc(collection: &str, id: &str, fields: &Value) -> Value {
    json!({
        "name": format!(
            "projects/test/databases/(default)/documents/{}/{}",
            collection, id
        ),
        "fields": to_firestore_fields(fields),
        "createTime": "2026-07-20T10:00:00Z",
        "updateTime": "2026-07-20T10:00:00Z",
    })
}

/// A `:runQuery` response. An empty result is a single read-time entry with
/// no document, which is what the real endpoint sends.
pub fn run_query_response(docs: &[Value]) -> Value {
    if docs.is_empty() {
        return json!([{ "readTime": "2026-07-20T10:00:00Z" }]);
    }
    Value::Array(
        docs.iter()
            .map(|doc| json!({ "document": doc, "readTime": "2026-07-20T10:00:00Z" }))
            .collect(),
    )
}

pub fn tournament_fields(user_id: &str) -> Value {
    json!({
        "userId": user_id,
        "game": "pokemon",
        "name": "City League",
        "format": "standard",
        "date": "2026-07-20",
        "deckName": "Charizard",
        "createdAt": "2026-07-20T10:00:00Z",
        "updatedAt": "2026-07-20T10:00:00Z",
    })
}

pub fn match_fields(user_id: &str, tournament_id: &str, round: u32, result: &str) -> Value {
    json!({
        "userId": user_id,
        "tournamentId": tournament_id,
        "game": "pokemon",
        "round": round,
        "opponent": "Misty",
        "opponentDeck": "Gyarados",
        "result": result,
        "createdAt": "2026-07-20T11:00:00Z",
        "updatedAt": "2026-07-20T11:00:00Z",
    })
}
