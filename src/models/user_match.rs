use serde::{Deserialize, Serialize};

pub const VALID_RESULTS: [&str; 3] = ["win", "loss", "tie"];

/// A single round result within a user-logged tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMatch {
    pub id: String,
    pub user_id: String,
    pub tournament_id: String,
    pub game: String,
    pub round: u32,
    pub opponent: String,
    pub opponent_deck: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_deck_image_url: Option<String>,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserMatchRequest {
    pub tournament_id: Option<String>,
    pub game: Option<String>,
    pub round: Option<u32>,
    pub opponent: Option<String>,
    pub opponent_deck: Option<String>,
    pub result: Option<String>,
    #[serde(default)]
    pub opponent_deck_image_url: Option<String>,
    #[serde(default)]
    pub my_score: Option<i64>,
    #[serde(default)]
    pub opponent_score: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Owner, tournament linkage, id and creation time are immutable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserMatchRequest {
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub opponent_deck: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub opponent_deck_image_url: Option<String>,
    #[serde(default)]
    pub my_score: Option<i64>,
    #[serde(default)]
    pub opponent_score: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Win/loss summary across a tournament's matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub total_games: u32,
    pub win_rate: f64,
}

pub fn calculate_stats(matches: &[UserMatch]) -> MatchStats {
    let mut wins = 0;
    let mut losses = 0;
    let mut ties = 0;

    for m in matches {
        match m.result.as_str() {
            "win" => wins += 1,
            "loss" => losses += 1,
            "tie" => ties += 1,
            _ => {}
        }
    }

    let total_games = wins + losses + ties;
    let win_rate = if total_games > 0 {
        let rate = f64::from(wins) / f64::from(total_games) * 100.0;
        (rate * 100.0).round() / 100.0
    } else {
        0.0
    };

    MatchStats {
        wins,
        losses,
        ties,
        total_games,
        win_rate,
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserMatchListResponse {
    pub matches: Vec<UserMatch>,
    pub count: usize,
    pub stats: MatchStats,
}
