use serde::{Deserialize, Serialize};

use super::game::GameSummary;

/// A user's personal record of playing a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub played_on: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub mastered: bool,
    #[serde(default)]
    pub game: Option<GameSummary>,
}

/// Body sent to `POST|PUT /games/{id}/library`. Empty optional fields are
/// left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryForm {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub played_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub mastered: bool,
}

impl From<&LibraryEntry> for LibraryForm {
    fn from(entry: &LibraryEntry) -> Self {
        Self {
            status: entry.status.clone(),
            rating: entry.rating,
            played_on: entry.played_on.clone().unwrap_or_default(),
            start_date: entry.start_date.clone().filter(|d| !d.is_empty()),
            end_date: entry.end_date.clone().filter(|d| !d.is_empty()),
            mastered: entry.mastered,
        }
    }
}
