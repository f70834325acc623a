use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::games::{AdapterRegistry, DEFAULT_GAME};
use crate::handlers::responses;
use crate::models::meta::TournamentsRecentResponse;
use crate::models::tournament::TournamentSummary;
use crate::services::cache::TOURNAMENTS_TTL_SECS;
use crate::services::CacheService;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_days() -> i64 {
    7
}

fn default_format() -> String {
    "standard".to_string()
}

fn default_limit() -> usize {
    50
}

pub async fn recent(
    path: web::Path<String>,
    query: web::Query<RecentQuery>,
    registry: web::Data<AdapterRegistry>,
    cache: web::Data<CacheService>,
) -> HttpResponse {
    recent_for(&path.into_inner(), query.into_inner(), &registry, &cache).await
}

pub async fn legacy_recent(
    query: web::Query<RecentQuery>,
    registry: web::Data<AdapterRegistry>,
    cache: web::Data<CacheService>,
) -> HttpResponse {
    recent_for(DEFAULT_GAME, query.into_inner(), &registry, &cache).await
}

#[tracing::instrument(name = "Recent tournaments", skip(registry, cache))]
async fn recent_for(
    game: &str,
    query: RecentQuery,
    registry: &AdapterRegistry,
    cache: &CacheService,
) -> HttpResponse {
    let format = query.format.to_lowercase();
    let Some(adapter) = registry.get(game) else {
        return responses::coming_soon(game);
    };

    let cache_key = CacheService::tournaments_key(game, &format, query.days, query.limit);
    if let Some(cached) = cache.get::<serde_json::Value>(&cache_key).await {
        return responses::json_with_cache(&cached, "HIT");
    }

    let tournaments = match adapter
        .fetch_tournaments(query.days, &format, query.limit)
        .await
    {
        Ok(tournaments) => tournaments,
        Err(err) => return responses::adapter_error(game, &err),
    };

    let summaries: Vec<TournamentSummary> = tournaments.iter().map(Into::into).collect();
    let response = TournamentsRecentResponse {
        updated_at: Utc::now(),
        format,
        days: query.days,
        count: summaries.len(),
        tournaments: summaries,
    };
    cache.set(&cache_key, &response, TOURNAMENTS_TTL_SECS).await;

    responses::json_with_cache(&response, "MISS")
}
