use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A tournament as returned by the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub players: Option<u32>,
}

/// Compact tournament listing entry served by the recent-tournaments endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub players: u32,
    pub format: Option<String>,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            date: t.date,
            players: t.players.unwrap_or(0),
            format: t.format.clone(),
        }
    }
}

/// One player's result within a tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub placing: Option<u32>,
    #[serde(default)]
    pub record: Option<Record>,
    #[serde(default)]
    pub deck: Option<DeckRef>,
    #[serde(default)]
    pub decklist: Option<Decklist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
}

/// Deck archetype reference attached to a standing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckRef {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decklist {
    #[serde(default)]
    pub pokemon: Vec<Card>,
    #[serde(default)]
    pub trainer: Vec<Card>,
    #[serde(default)]
    pub energy: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// The upstream API is loose about id/number types: sometimes strings,
// sometimes bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_parses_with_missing_optional_fields() {
        let standing: Standing = serde_json::from_value(serde_json::json!({
            "name": "Ash",
            "placing": 1
        }))
        .unwrap();
        assert_eq!(standing.name.as_deref(), Some("Ash"));
        assert!(standing.deck.is_none());
        assert!(standing.decklist.is_none());
    }

    #[test]
    fn card_number_accepts_string_and_number() {
        let card: Card =
            serde_json::from_value(serde_json::json!({"name": "Pikachu", "number": 25})).unwrap();
        assert_eq!(card.number.as_deref(), Some("25"));

        let card: Card =
            serde_json::from_value(serde_json::json!({"name": "Pikachu", "number": "025"}))
                .unwrap();
        assert_eq!(card.number.as_deref(), Some("025"));
    }

    #[test]
    fn tournament_id_accepts_number() {
        let tournament: Tournament = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Regional",
            "date": "2026-07-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(tournament.id, "42");
    }
}
