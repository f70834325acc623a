use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode};

use crate::config::settings::LimitlessSettings;
use crate::games::pokemon::constants::UPSTREAM_GAME_CODE;
use crate::games::AdapterError;
use crate::models::tournament::{Standing, Tournament};

/// Retries per standings fetch (after the initial attempt) before degrading
/// to an empty result.
pub const STANDINGS_RETRY_BUDGET: u32 = 3;

/// Limitless TCG API client.
pub struct LimitlessClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
enum StandingsAttemptError {
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },
    #[error("upstream API error: {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl LimitlessClient {
    pub fn new(settings: &LimitlessSettings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.base_url.clone(),
        }
    }

    /// Fetch tournaments and filter to the lookback window. No retry: a
    /// failure here propagates to the caller.
    pub async fn fetch_tournaments(
        &self,
        days: i64,
        format: &str,
        limit: usize,
    ) -> Result<Vec<Tournament>, AdapterError> {
        let cutoff = Utc::now() - chrono::Duration::days(days);

        let response = self
            .http
            .get(format!("{}/tournaments", self.base_url))
            .query(&[
                ("game", UPSTREAM_GAME_CODE.to_string()),
                ("format", format.to_uppercase()),
                ("limit", limit.to_string()),
                ("page", "0".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        // The API returns either a bare array or {"tournaments": [...]}
        let payload: serde_json::Value = response.json().await?;
        let raw = match payload {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => map
                .remove("tournaments")
                .and_then(|v| match v {
                    serde_json::Value::Array(items) => Some(items),
                    _ => None,
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        let tournaments = raw
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Tournament>(item) {
                Ok(tournament) => Some(tournament),
                Err(err) => {
                    tracing::warn!("Skipping unparseable tournament entry: {}", err);
                    None
                }
            })
            .filter(|tournament| tournament.date >= cutoff)
            .collect();

        Ok(tournaments)
    }

    /// Fetch standings for one tournament, retrying on rate limits and
    /// transient failures. Exhausting the budget returns an empty list so a
    /// single flaky tournament does not fail a whole aggregation.
    pub async fn fetch_standings(&self, tournament_id: &str) -> Vec<Standing> {
        for attempt in 0..=STANDINGS_RETRY_BUDGET {
            match self.standings_attempt(tournament_id).await {
                Ok(standings) => return standings,
                Err(err) if attempt == STANDINGS_RETRY_BUDGET => {
                    tracing::error!(
                        "fetch_standings({}) failed after {} retries: {}",
                        tournament_id,
                        STANDINGS_RETRY_BUDGET,
                        err
                    );
                    return Vec::new();
                }
                Err(StandingsAttemptError::RateLimited { retry_after }) => {
                    let delay =
                        retry_after.unwrap_or_else(|| Duration::from_secs(1 << attempt));
                    tracing::warn!(
                        "Rate limited on standings for {}, waiting {:?} (retry {}/{})",
                        tournament_id,
                        delay,
                        attempt + 1,
                        STANDINGS_RETRY_BUDGET
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(_) => {
                    tokio::time::sleep(Duration::from_secs(u64::from(attempt) + 1)).await;
                }
            }
        }
        Vec::new()
    }

    async fn standings_attempt(
        &self,
        tournament_id: &str,
    ) -> Result<Vec<Standing>, StandingsAttemptError> {
        let response = self
            .http
            .get(format!(
                "{}/tournaments/{}/standings",
                self.base_url, tournament_id
            ))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(StandingsAttemptError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(StandingsAttemptError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}
