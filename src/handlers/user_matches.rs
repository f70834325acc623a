use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthenticatedUser;
use crate::handlers::responses;
use crate::handlers::user_tournaments::{document_fields, fetch_owned_tournament};
use crate::models::user_match::{
    calculate_stats, CreateUserMatchRequest, UpdateUserMatchRequest, UserMatch,
    UserMatchListResponse, VALID_RESULTS,
};
use crate::services::FirestoreClient;

pub const COLLECTION: &str = "user_matches";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub tournament_id: Option<String>,
}

fn invalid_result() -> HttpResponse {
    responses::bad_request(format!(
        "Invalid result. Must be one of: {}",
        VALID_RESULTS.join(", ")
    ))
}

#[tracing::instrument(name = "Create user match", skip(auth, body, firestore))]
pub async fn create_match(
    auth: AuthenticatedUser,
    body: web::Json<CreateUserMatchRequest>,
    firestore: web::Data<FirestoreClient>,
) -> HttpResponse {
    let body = body.into_inner();

    let mut missing = Vec::new();
    if body.tournament_id.as_deref().map_or(true, str::is_empty) {
        missing.push("tournamentId");
    }
    if body.game.as_deref().map_or(true, str::is_empty) {
        missing.push("game");
    }
    if body.round.is_none() {
        missing.push("round");
    }
    if body.opponent.as_deref().map_or(true, str::is_empty) {
        missing.push("opponent");
    }
    if body.opponent_deck.as_deref().map_or(true, str::is_empty) {
        missing.push("opponentDeck");
    }
    if body.result.as_deref().map_or(true, str::is_empty) {
        missing.push("result");
    }
    if !missing.is_empty() {
        return responses::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        ));
    }

    let result = body.result.as_deref().unwrap_or_default();
    if !VALID_RESULTS.contains(&result) {
        return invalid_result();
    }

    // The match must hang off a tournament the caller owns.
    let tournament_id = body.tournament_id.as_deref().unwrap_or_default();
    if let Err(response) =
        fetch_owned_tournament(&firestore, tournament_id, &auth.user.user_id).await
    {
        return response;
    }

    let now = Utc::now().to_rfc3339();
    let data = json!({
        "userId": auth.user.user_id,
        "tournamentId": body.tournament_id,
        "game": body.game,
        "round": body.round,
        "opponent": body.opponent,
        "opponentDeck": body.opponent_deck,
        "opponentDeckImageUrl": body.opponent_deck_image_url,
        "result": body.result,
        "myScore": body.my_score,
        "opponentScore": body.opponent_score,
        "notes": body.notes,
        "createdAt": now,
        "updatedAt": now,
    });

    match firestore.create_document(COLLECTION, &data).await {
        Ok(doc) => HttpResponse::Created().json(doc),
        Err(err) => {
            tracing::error!("Failed to create user match: {}", err);
            responses::internal_error("Failed to create match", err)
        }
    }
}

#[tracing::instrument(name = "List user matches", skip(auth, firestore))]
pub async fn list_matches(
    auth: AuthenticatedUser,
    query: web::Query<ListQuery>,
    firestore: web::Data<FirestoreClient>,
) -> HttpResponse {
    let Some(tournament_id) = query.tournament_id.as_deref().filter(|id| !id.is_empty())
    else {
        return responses::bad_request("Missing required query parameter: tournamentId");
    };

    if let Err(response) =
        fetch_owned_tournament(&firestore, tournament_id, &auth.user.user_id).await
    {
        return response;
    }

    let filters = vec![
        ("userId", json!(auth.user.user_id)),
        ("tournamentId", json!(tournament_id)),
    ];
    let docs = match firestore.query_documents(COLLECTION, &filters).await {
        Ok(docs) => docs,
        Err(err) => {
            tracing::error!("Failed to list user matches: {}", err);
            return responses::internal_error("Failed to list matches", err);
        }
    };

    let mut matches: Vec<UserMatch> = docs
        .into_iter()
        .filter_map(|doc| match serde_json::from_value(doc) {
            Ok(user_match) => Some(user_match),
            Err(err) => {
                tracing::warn!("Skipping malformed match document: {}", err);
                None
            }
        })
        .collect();
    matches.sort_by_key(|m| m.round);

    let stats = calculate_stats(&matches);
    HttpResponse::Ok().json(UserMatchListResponse {
        count: matches.len(),
        stats,
        matches,
    })
}

#[tracing::instrument(name = "Update user match", skip(auth, body, firestore))]
pub async fn update_match(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<UpdateUserMatchRequest>,
    firestore: web::Data<FirestoreClient>,
) -> HttpResponse {
    let id = path.into_inner();

    let mut user_match = match fetch_owned_match(&firestore, &id, &auth.user.user_id).await {
        Ok(user_match) => user_match,
        Err(response) => return response,
    };

    let body = body.into_inner();
    if let Some(result) = body.result.as_deref() {
        if !VALID_RESULTS.contains(&result) {
            return invalid_result();
        }
    }

    if let Some(game) = body.game {
        user_match.game = game;
    }
    if let Some(round) = body.round {
        user_match.round = round;
    }
    if let Some(opponent) = body.opponent {
        user_match.opponent = opponent;
    }
    if let Some(opponent_deck) = body.opponent_deck {
        user_match.opponent_deck = opponent_deck;
    }
    if let Some(result) = body.result {
        user_match.result = result;
    }
    if body.opponent_deck_image_url.is_some() {
        user_match.opponent_deck_image_url = body.opponent_deck_image_url;
    }
    if body.my_score.is_some() {
        user_match.my_score = body.my_score;
    }
    if body.opponent_score.is_some() {
        user_match.opponent_score = body.opponent_score;
    }
    if body.notes.is_some() {
        user_match.notes = body.notes;
    }
    user_match.updated_at = Utc::now().to_rfc3339();

    match firestore
        .update_document(COLLECTION, &id, &document_fields(&user_match))
        .await
    {
        Ok(_) => HttpResponse::Ok().json(user_match),
        Err(err) => {
            tracing::error!("Failed to update user match {}: {}", id, err);
            responses::internal_error("Failed to update match", err)
        }
    }
}

#[tracing::instrument(name = "Delete user match", skip(auth, firestore))]
pub async fn delete_match(
    auth: AuthenticatedUser,
    path: web::Path<String>,
    firestore: web::Data<FirestoreClient>,
) -> HttpResponse {
    let id = path.into_inner();

    if let Err(response) = fetch_owned_match(&firestore, &id, &auth.user.user_id).await {
        return response;
    }

    match firestore.delete_document(COLLECTION, &id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => {
            tracing::error!("Failed to delete user match {}: {}", id, err);
            responses::internal_error("Failed to delete match", err)
        }
    }
}

async fn fetch_owned_match(
    firestore: &FirestoreClient,
    id: &str,
    user_id: &str,
) -> Result<UserMatch, HttpResponse> {
    let doc = match firestore.get_document(COLLECTION, id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return Err(responses::not_found("Match not found")),
        Err(err) => {
            tracing::error!("Failed to fetch user match {}: {}", id, err);
            return Err(responses::internal_error("Failed to fetch match", err));
        }
    };

    let user_match: UserMatch = match serde_json::from_value(doc) {
        Ok(user_match) => user_match,
        Err(err) => {
            tracing::error!("Malformed match document {}: {}", id, err);
            return Err(responses::internal_error("Malformed match document", err));
        }
    };

    if user_match.user_id != user_id {
        return Err(responses::forbidden());
    }
    Ok(user_match)
}
