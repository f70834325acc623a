use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::games::pokemon::{MAX_TOURNAMENTS_PER_AGGREGATION, STANDINGS_REQUEST_DELAY, TOURNAMENT_FETCH_LIMIT};
use crate::games::{AdapterRegistry, DEFAULT_GAME};
use crate::handlers::responses;
use crate::models::meta::{DeckDetailsResponse, MetaTopResponse};
use crate::models::tournament::Standing;
use crate::services::cache::{DECK_TTL_SECS, META_TTL_SECS};
use crate::services::CacheService;

#[derive(Debug, Deserialize)]
pub struct MetaTopQuery {
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct DeckDetailsQuery {
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_days() -> i64 {
    7
}

fn default_format() -> String {
    "standard".to_string()
}

fn default_limit() -> usize {
    10
}

pub async fn meta_top(
    path: web::Path<String>,
    query: web::Query<MetaTopQuery>,
    registry: web::Data<AdapterRegistry>,
    cache: web::Data<CacheService>,
) -> HttpResponse {
    meta_top_for(&path.into_inner(), query.into_inner(), &registry, &cache).await
}

pub async fn legacy_meta_top(
    query: web::Query<MetaTopQuery>,
    registry: web::Data<AdapterRegistry>,
    cache: web::Data<CacheService>,
) -> HttpResponse {
    meta_top_for(DEFAULT_GAME, query.into_inner(), &registry, &cache).await
}

#[tracing::instrument(name = "Meta top decks", skip(registry, cache))]
async fn meta_top_for(
    game: &str,
    query: MetaTopQuery,
    registry: &AdapterRegistry,
    cache: &CacheService,
) -> HttpResponse {
    let format = query.format.to_lowercase();
    let Some(adapter) = registry.get(game) else {
        return responses::coming_soon(game);
    };

    let cache_key = CacheService::meta_key(game, &format, query.days, query.limit);
    if let Some(cached) = cache.get::<serde_json::Value>(&cache_key).await {
        return responses::json_with_cache(&cached, "HIT");
    }

    let tournaments = match adapter
        .fetch_tournaments(query.days, &format, TOURNAMENT_FETCH_LIMIT)
        .await
    {
        Ok(tournaments) => tournaments,
        Err(err) => return responses::adapter_error(game, &err),
    };
    tracing::info!(
        "Found {} tournaments in the last {} days",
        tournaments.len(),
        query.days
    );

    if tournaments.is_empty() {
        return HttpResponse::Ok().json(MetaTopResponse {
            updated_at: Utc::now(),
            format,
            days: query.days,
            decks: vec![],
            message: Some("No tournaments found".to_string()),
        });
    }

    let to_process = &tournaments[..tournaments.len().min(MAX_TOURNAMENTS_PER_AGGREGATION)];
    let mut all_standings: Vec<Standing> = Vec::new();
    for (i, tournament) in to_process.iter().enumerate() {
        match adapter.fetch_standings(&tournament.id).await {
            Ok(standings) => all_standings.extend(standings),
            Err(err) => return responses::adapter_error(game, &err),
        }
        if i + 1 < to_process.len() {
            tokio::time::sleep(STANDINGS_REQUEST_DELAY).await;
        }
    }

    let mut decks = match adapter.aggregate_decks(&all_standings) {
        Ok(decks) => decks,
        Err(err) => return responses::adapter_error(game, &err),
    };
    decks.truncate(query.limit);

    let response = MetaTopResponse {
        updated_at: Utc::now(),
        format,
        days: query.days,
        decks,
        message: None,
    };
    cache.set(&cache_key, &response, META_TTL_SECS).await;

    responses::json_with_cache(&response, "MISS")
}

pub async fn deck_details(
    path: web::Path<(String, String)>,
    query: web::Query<DeckDetailsQuery>,
    registry: web::Data<AdapterRegistry>,
    cache: web::Data<CacheService>,
) -> HttpResponse {
    let (game, deck_name) = path.into_inner();
    deck_details_for(&game, &deck_name, query.into_inner(), &registry, &cache).await
}

pub async fn legacy_deck_details(
    path: web::Path<String>,
    query: web::Query<DeckDetailsQuery>,
    registry: web::Data<AdapterRegistry>,
    cache: web::Data<CacheService>,
) -> HttpResponse {
    deck_details_for(
        DEFAULT_GAME,
        &path.into_inner(),
        query.into_inner(),
        &registry,
        &cache,
    )
    .await
}

#[tracing::instrument(name = "Deck details", skip(registry, cache))]
async fn deck_details_for(
    game: &str,
    deck_name: &str,
    query: DeckDetailsQuery,
    registry: &AdapterRegistry,
    cache: &CacheService,
) -> HttpResponse {
    let format = query.format.to_lowercase();
    let Some(adapter) = registry.get(game) else {
        return responses::coming_soon(game);
    };

    let cache_key = CacheService::deck_key(game, deck_name, &format, query.days);
    if let Some(cached) = cache.get::<serde_json::Value>(&cache_key).await {
        return responses::json_with_cache(&cached, "HIT");
    }

    let deck = match adapter
        .fetch_deck_details(deck_name, query.days, &format)
        .await
    {
        Ok(Some(deck)) => deck,
        Ok(None) => {
            return responses::not_found(format!(
                "No recent data found for deck: {}",
                deck_name
            ));
        }
        Err(err) => return responses::adapter_error(game, &err),
    };

    let mut deck = deck;
    if let Some(card) = &deck.main_card {
        deck.set_color = Some(adapter.set_color(card.set.as_deref().unwrap_or("")));
        deck.set_code = card.set.clone();
    }

    let response = DeckDetailsResponse {
        updated_at: Utc::now(),
        format,
        days: query.days,
        deck,
    };
    cache.set(&cache_key, &response, DECK_TTL_SECS).await;

    responses::json_with_cache(&response, "MISS")
}
