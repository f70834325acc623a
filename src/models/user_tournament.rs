use serde::{Deserialize, Serialize};

/// A user-logged tournament attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTournament {
    pub id: String,
    pub user_id: String,
    pub game: String,
    pub name: String,
    pub format: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decklist_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserTournamentRequest {
    pub game: Option<String>,
    pub name: Option<String>,
    pub format: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub deck_name: Option<String>,
    #[serde(default)]
    pub deck_image_url: Option<String>,
    #[serde(default)]
    pub decklist_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Every field optional; only provided fields are applied. Owner, id and
/// creation time are not representable here and therefore immutable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserTournamentRequest {
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub deck_name: Option<String>,
    #[serde(default)]
    pub deck_image_url: Option<String>,
    #[serde(default)]
    pub decklist_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserTournamentListResponse {
    pub tournaments: Vec<UserTournament>,
    pub count: usize,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}
