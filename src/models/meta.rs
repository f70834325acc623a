use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::tournament::{Decklist, Record};

/// Representative card for a deck archetype, used for imagery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainCard {
    pub name: String,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

/// How often a deck archetype appeared across a set of standings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckAggregate {
    pub name: String,
    pub count: u32,
    pub main_card: Option<MainCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<String>,
    #[serde(default)]
    pub icons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_url: Option<String>,
}

// Top-level response keys stay snake_case (`updated_at`), matching what
// existing clients already parse; deck fields inside are camelCase.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetaTopResponse {
    pub updated_at: DateTime<Utc>,
    pub format: String,
    pub days: i64,
    pub decks: Vec<DeckAggregate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TournamentsRecentResponse {
    pub updated_at: DateTime<Utc>,
    pub format: String,
    pub days: i64,
    pub count: usize,
    pub tournaments: Vec<crate::models::tournament::TournamentSummary>,
}

/// Notable finish for a deck within the lookback window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopPlacement {
    pub placing: u32,
    pub player: String,
    pub tournament: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
}

/// Detailed view of one deck archetype, built from recent standings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDetails {
    pub name: String,
    pub appearances: u32,
    pub top_placements: Vec<TopPlacement>,
    pub card_list: Option<Decklist>,
    pub main_card: Option<MainCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckDetailsResponse {
    pub updated_at: DateTime<Utc>,
    pub format: String,
    pub days: i64,
    pub deck: DeckDetails,
}
