use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::game::GameSummary;
use super::review::Like;
use super::user::UserSummary;

/// How a list's entries are ordered. Every mode but [`ListOrdering::Custom`]
/// is derived server-side from a game attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrdering {
    #[default]
    #[serde(alias = "alphabetical")]
    TitleAsc,
    TitleDesc,
    #[serde(alias = "release_date")]
    YearAsc,
    YearDesc,
    UserRating,
    Custom,
}

impl ListOrdering {
    pub const ALL: [Self; 6] = [
        Self::TitleAsc,
        Self::TitleDesc,
        Self::YearAsc,
        Self::YearDesc,
        Self::UserRating,
        Self::Custom,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TitleAsc => "title_asc",
            Self::TitleDesc => "title_desc",
            Self::YearAsc => "year_asc",
            Self::YearDesc => "year_desc",
            Self::UserRating => "user_rating",
            Self::Custom => "custom",
        }
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TitleAsc => "Title (A-Z)",
            Self::TitleDesc => "Title (Z-A)",
            Self::YearAsc => "Oldest first",
            Self::YearDesc => "Newest first",
            Self::UserRating => "User rating",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for ListOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title_asc" | "alphabetical" => Ok(Self::TitleAsc),
            "title_desc" => Ok(Self::TitleDesc),
            "year_asc" | "release_date" => Ok(Self::YearAsc),
            "year_desc" => Ok(Self::YearDesc),
            "user_rating" => Ok(Self::UserRating),
            "custom" => Ok(Self::Custom),
            other => Err(format!(
                "unknown ordering '{other}', expected one of: title_asc, title_desc, year_asc, year_desc, user_rating, custom"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub game_id: String,
    #[serde(default)]
    pub note: String,
    /// Position in a custom-ordered list. Absent for every other ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<GameSummary>,
}

impl ListEntry {
    #[must_use]
    pub fn title(&self) -> &str {
        self.game.as_ref().map_or(self.game_id.as_str(), |g| g.title.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameList {
    pub id: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_ranked: bool,
    #[serde(default)]
    pub ordering: ListOrdering,
    #[serde(default)]
    pub games: Vec<ListEntry>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl GameList {
    #[must_use]
    pub fn game_count(&self) -> u64 {
        self.games_count.unwrap_or(self.games.len() as u64)
    }

    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_wire_names() {
        let ordering: ListOrdering = serde_json::from_str(r#""year_desc""#).unwrap();
        assert_eq!(ordering, ListOrdering::YearDesc);

        let legacy: ListOrdering = serde_json::from_str(r#""alphabetical""#).unwrap();
        assert_eq!(legacy, ListOrdering::TitleAsc);

        assert_eq!(serde_json::to_string(&ListOrdering::Custom).unwrap(), r#""custom""#);
        assert!("by_vibes".parse::<ListOrdering>().is_err());
    }

    #[test]
    fn test_list_ordered_by_user_rating_decodes() {
        let list: GameList = serde_json::from_str(
            r#"{"id":"l1","name":"Best rated","ordering":"user_rating","games":[{"game_id":"g1"}]}"#,
        )
        .unwrap();

        assert_eq!(list.ordering, ListOrdering::UserRating);
        assert!(!list.ordering.is_custom());
        assert_eq!("user_rating".parse::<ListOrdering>(), Ok(ListOrdering::UserRating));
        assert_eq!(list.ordering.to_string(), "user_rating");
    }

    #[test]
    fn test_entry_without_order_omits_field() {
        let entry = ListEntry {
            game_id: "g1".into(),
            note: String::new(),
            order: None,
            game: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("order").is_none());
        assert_eq!(entry.title(), "g1");
    }
}
