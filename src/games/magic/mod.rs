use async_trait::async_trait;

use crate::games::pokemon::constants::DEFAULT_SET_COLOR;
use crate::games::{AdapterError, GameAdapter};
use crate::models::meta::{DeckAggregate, DeckDetails};
use crate::models::tournament::{Standing, Tournament};

/// Magic: The Gathering adapter stub. Registered so the game shows up as a
/// known route, but every operation reports not-implemented.
pub struct MagicAdapter;

impl MagicAdapter {
    pub fn new() -> Self {
        Self
    }

    fn not_implemented<T>(&self) -> Result<T, AdapterError> {
        Err(AdapterError::NotImplemented {
            game: self.game().to_string(),
        })
    }
}

impl Default for MagicAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameAdapter for MagicAdapter {
    fn game(&self) -> &str {
        "magic"
    }

    async fn fetch_tournaments(
        &self,
        _days: i64,
        _format: &str,
        _limit: usize,
    ) -> Result<Vec<Tournament>, AdapterError> {
        self.not_implemented()
    }

    async fn fetch_standings(&self, _tournament_id: &str) -> Result<Vec<Standing>, AdapterError> {
        self.not_implemented()
    }

    async fn fetch_deck_details(
        &self,
        _deck_name: &str,
        _days: i64,
        _format: &str,
    ) -> Result<Option<DeckDetails>, AdapterError> {
        self.not_implemented()
    }

    fn aggregate_decks(&self, _standings: &[Standing]) -> Result<Vec<DeckAggregate>, AdapterError> {
        self.not_implemented()
    }

    fn set_color(&self, _card_set: &str) -> String {
        DEFAULT_SET_COLOR.to_string()
    }
}
