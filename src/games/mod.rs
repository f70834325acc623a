use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::meta::{DeckAggregate, DeckDetails};
use crate::models::tournament::{Standing, Tournament};

pub mod magic;
pub mod pokemon;

pub const DEFAULT_GAME: &str = "pokemon";

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("{game} support is not yet implemented")]
    NotImplemented { game: String },
    #[error("upstream API error: {status}")]
    UpstreamStatus { status: u16 },
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// One trading-card game's view of the upstream tournament data.
#[async_trait]
pub trait GameAdapter: Send + Sync {
    fn game(&self) -> &str;

    /// Recent tournaments within the lookback window.
    async fn fetch_tournaments(
        &self,
        days: i64,
        format: &str,
        limit: usize,
    ) -> Result<Vec<Tournament>, AdapterError>;

    /// Standings for one tournament. Implementations degrade to an empty
    /// list when the upstream stays unavailable through the retry budget.
    async fn fetch_standings(&self, tournament_id: &str) -> Result<Vec<Standing>, AdapterError>;

    /// Detailed deck info aggregated from recent standings. None when the
    /// deck made no appearance in the window.
    async fn fetch_deck_details(
        &self,
        deck_name: &str,
        days: i64,
        format: &str,
    ) -> Result<Option<DeckDetails>, AdapterError>;

    fn aggregate_decks(&self, standings: &[Standing]) -> Result<Vec<DeckAggregate>, AdapterError>;

    fn set_color(&self, card_set: &str) -> String;
}

/// Lookup table of game adapters, built once at startup and passed to the
/// handlers as shared state.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn GameAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn GameAdapter>) {
        self.adapters
            .insert(adapter.game().to_lowercase(), adapter);
    }

    pub fn get(&self, game: &str) -> Option<&Arc<dyn GameAdapter>> {
        self.adapters.get(&game.to_lowercase())
    }

    pub fn is_supported(&self, game: &str) -> bool {
        self.adapters.contains_key(&game.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::LimitlessSettings;
    use crate::games::magic::MagicAdapter;
    use crate::games::pokemon::{LimitlessClient, PokemonAdapter};

    fn test_registry() -> AdapterRegistry {
        let client = Arc::new(LimitlessClient::new(&LimitlessSettings {
            base_url: "http://localhost:0".into(),
        }));
        let mut registry = AdapterRegistry::new();
        registry.register(Arc::new(PokemonAdapter::new(client)));
        registry.register(Arc::new(MagicAdapter::new()));
        registry
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = test_registry();
        assert!(registry.is_supported("Pokemon"));
        assert!(registry.is_supported("MAGIC"));
        assert!(registry.get("POKEMON").is_some());
    }

    #[test]
    fn unknown_game_is_unsupported() {
        let registry = test_registry();
        assert!(!registry.is_supported("yugioh"));
        assert!(registry.get("yugioh").is_none());
    }

    #[tokio::test]
    async fn stub_adapter_reports_not_implemented() {
        let registry = test_registry();
        let magic = registry.get("magic").unwrap();
        let err = magic.fetch_tournaments(7, "standard", 10).await.unwrap_err();
        assert!(matches!(err, AdapterError::NotImplemented { .. }));
    }
}
