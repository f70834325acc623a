use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthenticatedUser;
use crate::handlers::responses;
use crate::models::user_tournament::{
    CreateUserTournamentRequest, UpdateUserTournamentRequest, UserTournament,
    UserTournamentListResponse,
};
use crate::services::FirestoreClient;

pub const COLLECTION: &str = "user_tournaments";
pub const MATCHES_COLLECTION: &str = "user_matches";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

#[tracing::instrument(name = "Create user tournament", skip(auth, body, firestore))]
pub async fn create_tournament(
    auth: AuthenticatedUser,
    body: web::Json<CreateUserTournamentRequest>,
    firestore: web::Data<FirestoreClient>,
) -> HttpResponse {
    let body = body.into_inner();

    let mut missing = Vec::new();
    if body.game.as_deref().map_or(true, str::is_empty) {
        missing.push("game");
    }
    if body.name.as_deref().map_or(true, str::is_empty) {
        missing.push("name");
    }
    if body.format.as_deref().map_or(true, str::is_empty) {
        missing.push("format");
    }
    if body.date.as_deref().map_or(true, str::is_empty) {
        missing.push("date");
    }
    if !missing.is_empty() {
        return responses::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        ));
    }

    let now = Utc::now().to_rfc3339();
    let data = json!({
        "userId": auth.user.user_id,
        "game": body.game,
        "name": body.name,
        "format": body.format,
        "date": body.date,
        "location": body.location,
        "imageUrl": body.image_url,
        "deckName": body.deck_name,
        "deckImageUrl": body.deck_image_url,
        "decklistUrl": body.decklist_url,
        "notes": body.notes,
        "createdAt": now,
        "updatedAt": now,
    });

    match firestore.create_document(COLLECTION, &data).await {
        Ok(doc) => HttpResponse::Created().json(doc),
        Err(err) => {
            tracing::error!("Failed to create user tournament: {}", err);
            responses::internal_error("Failed to create tournament", err)
        }
    }
}

#[tracing::instrument(name = "List user tournaments", skip(auth, firestore))]
pub async fn list_tournaments(
    auth: AuthenticatedUser,
    query: web::Query<ListQuery>,
    firestore: web::Data<FirestoreClient>,
) -> HttpResponse {
    let mut filters: Vec<(&str, Value)> = vec![("userId", json!(auth.user.user_id))];
    if let Some(game) = query.game.as_deref().filter(|g| !g.is_empty()) {
        filters.push(("game", json!(game)));
    }

    let docs = match firestore.query_documents(COLLECTION, &filters).await {
        Ok(docs) => docs,
        Err(err) => {
            tracing::error!("Failed to list user tournaments: {}", err);
            return responses::internal_error("Failed to list tournaments", err);
        }
    };

    let mut tournaments: Vec<UserTournament> = docs
        .into_iter()
        .filter_map(|doc| match serde_json::from_value(doc) {
            Ok(tournament) => Some(tournament),
            Err(err) => {
                tracing::warn!("Skipping malformed tournament document: {}", err);
                None
            }
        })
        .collect();
    tournaments.sort_by(|a, b| b.date.cmp(&a.date));

    let total = tournaments.len();
    let page: Vec<UserTournament> = tournaments
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect();

    HttpResponse::Ok().json(UserTournamentListResponse {
        count: page.len(),
        total,
        offset: query.offset,
        limit: query.limit,
        tournaments: page,
    })
}

#[tracing::instrument(name = "Update user tournament", skip(auth, body, firestore))]
pub async fn update_tournament(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateUserTournamentRequest>,
    firestore: web::Data<FirestoreClient>,
) -> HttpResponse {
    let id = path.into_inner();

    let mut tournament =
        match fetch_owned_tournament(&firestore, &id, &auth.user.user_id).await {
            Ok(tournament) => tournament,
            Err(response) => return response,
        };

    let body = body.into_inner();
    if let Some(game) = body.game {
        tournament.game = game;
    }
    if let Some(name) = body.name {
        tournament.name = name;
    }
    if let Some(format) = body.format {
        tournament.format = format;
    }
    if let Some(date) = body.date {
        tournament.date = date;
    }
    if body.location.is_some() {
        tournament.location = body.location;
    }
    if body.image_url.is_some() {
        tournament.image_url = body.image_url;
    }
    if body.deck_name.is_some() {
        tournament.deck_name = body.deck_name;
    }
    if body.deck_image_url.is_some() {
        tournament.deck_image_url = body.deck_image_url;
    }
    if body.decklist_url.is_some() {
        tournament.decklist_url = body.decklist_url;
    }
    if body.notes.is_some() {
        tournament.notes = body.notes;
    }
    tournament.updated_at = Utc::now().to_rfc3339();

    match firestore
        .update_document(COLLECTION, &id, &document_fields(&tournament))
        .await
    {
        Ok(_) => HttpResponse::Ok().json(tournament),
        Err(err) => {
            tracing::error!("Failed to update user tournament {}: {}", id, err);
            responses::internal_error("Failed to update tournament", err)
        }
    }
}

#[tracing::instrument(name = "Delete user tournament", skip(auth, firestore))]
pub async fn delete_tournament(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    firestore: web::Data<FirestoreClient>,
) -> HttpResponse {
    let id = path.into_inner();

    if let Err(response) = fetch_owned_tournament(&firestore, &id, &auth.user.user_id).await {
        return response;
    }

    if let Err(err) = firestore.delete_document(COLLECTION, &id).await {
        tracing::error!("Failed to delete user tournament {}: {}", id, err);
        return responses::internal_error("Failed to delete tournament", err);
    }

    // Matches belong to their tournament; orphans are useless to the client.
    let filters: Vec<(&str, Value)> = vec![
        ("userId", json!(auth.user.user_id)),
        ("tournamentId", json!(id)),
    ];
    match firestore.query_documents(MATCHES_COLLECTION, &filters).await {
        Ok(matches) => {
            for doc in matches {
                let Some(match_id) = doc.get("id").and_then(Value::as_str) else {
                    continue;
                };
                if let Err(err) = firestore.delete_document(MATCHES_COLLECTION, match_id).await {
                    tracing::error!("Failed to cascade-delete match {}: {}", match_id, err);
                }
            }
        }
        Err(err) => {
            tracing::error!("Failed to list matches for cascade delete of {}: {}", id, err);
        }
    }

    HttpResponse::NoContent().finish()
}

/// Load a tournament document and enforce ownership. Returns the ready-made
/// error response (404/403/500) when the caller should not proceed.
pub async fn fetch_owned_tournament(
    firestore: &FirestoreClient,
    id: &str,
    user_id: &str,
) -> Result<UserTournament, HttpResponse> {
    let doc = match firestore.get_document(COLLECTION, id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return Err(responses::not_found("Tournament not found")),
        Err(err) => {
            tracing::error!("Failed to fetch user tournament {}: {}", id, err);
            return Err(responses::internal_error("Failed to fetch tournament", err));
        }
    };

    let tournament: UserTournament = match serde_json::from_value(doc) {
        Ok(tournament) => tournament,
        Err(err) => {
            tracing::error!("Malformed tournament document {}: {}", id, err);
            return Err(responses::internal_error("Malformed tournament document", err));
        }
    };

    if tournament.user_id != user_id {
        return Err(responses::forbidden());
    }
    Ok(tournament)
}

/// Serialize a record for a document write. The id lives in the document
/// path, not in its fields.
pub fn document_fields<T: serde::Serialize>(record: &T) -> Value {
    let mut value = serde_json::to_value(record).unwrap_or(Value::Null);
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    value
}
