use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::games::{AdapterError, GameAdapter};
use crate::models::meta::{DeckAggregate, DeckDetails, TopPlacement};
use crate::models::tournament::{Standing, Tournament};

pub mod constants;
pub mod enhancers;
pub mod limitless;

pub use limitless::LimitlessClient;

/// How many tournaments one aggregation request will walk. Each tournament
/// costs an upstream standings call, so this bounds request latency and
/// keeps us under the upstream rate limit.
pub const MAX_TOURNAMENTS_PER_AGGREGATION: usize = 5;

/// Pause between consecutive standings fetches within one request.
pub const STANDINGS_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// How many tournaments to ask the upstream for before windowing.
pub const TOURNAMENT_FETCH_LIMIT: usize = 50;

/// Placements at or above this count as notable finishes.
const TOP_PLACEMENT_CUTOFF: u32 = 8;

pub struct PokemonAdapter {
    client: Arc<LimitlessClient>,
}

impl PokemonAdapter {
    pub fn new(client: Arc<LimitlessClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GameAdapter for PokemonAdapter {
    fn game(&self) -> &str {
        "pokemon"
    }

    async fn fetch_tournaments(
        &self,
        days: i64,
        format: &str,
        limit: usize,
    ) -> Result<Vec<Tournament>, AdapterError> {
        self.client.fetch_tournaments(days, format, limit).await
    }

    async fn fetch_standings(&self, tournament_id: &str) -> Result<Vec<Standing>, AdapterError> {
        Ok(self.client.fetch_standings(tournament_id).await)
    }

    #[tracing::instrument(name = "Fetch deck details", skip(self))]
    async fn fetch_deck_details(
        &self,
        deck_name: &str,
        days: i64,
        format: &str,
    ) -> Result<Option<DeckDetails>, AdapterError> {
        let tournaments = self
            .client
            .fetch_tournaments(days, format, TOURNAMENT_FETCH_LIMIT)
            .await?;
        if tournaments.is_empty() {
            return Ok(None);
        }

        let mut details = DeckDetails {
            name: deck_name.to_string(),
            appearances: 0,
            top_placements: Vec::new(),
            card_list: None,
            main_card: None,
            set_color: None,
            set_code: None,
        };

        let to_process =
            &tournaments[..tournaments.len().min(MAX_TOURNAMENTS_PER_AGGREGATION)];
        for (i, tournament) in to_process.iter().enumerate() {
            let standings = self.client.fetch_standings(&tournament.id).await;

            for standing in &standings {
                let matches_deck =
                    standing.deck.as_ref().and_then(|d| d.name.as_deref()) == Some(deck_name);
                if !matches_deck {
                    continue;
                }
                details.appearances += 1;

                if let Some(placing) = standing.placing {
                    if placing <= TOP_PLACEMENT_CUTOFF {
                        details.top_placements.push(TopPlacement {
                            placing,
                            player: standing.name.clone().unwrap_or_default(),
                            tournament: tournament.name.clone(),
                            date: tournament.date,
                            record: standing.record.clone(),
                        });
                    }
                }

                if details.card_list.is_none() {
                    if let Some(decklist) = &standing.decklist {
                        details.card_list = Some(decklist.clone());
                        details.main_card = enhancers::extract_main_card(Some(decklist));
                    }
                }
            }

            if i + 1 < to_process.len() {
                tokio::time::sleep(STANDINGS_REQUEST_DELAY).await;
            }
        }

        if details.appearances == 0 {
            return Ok(None);
        }
        if let Some(card_list) = details.card_list.take() {
            details.card_list = Some(enhancers::enhance_decklist_images(card_list));
        }
        Ok(Some(details))
    }

    fn aggregate_decks(&self, standings: &[Standing]) -> Result<Vec<DeckAggregate>, AdapterError> {
        Ok(enhancers::aggregate_decks(standings))
    }

    fn set_color(&self, card_set: &str) -> String {
        constants::set_color(card_set).to_string()
    }
}
