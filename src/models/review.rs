use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::game::{GameSummary, Platform};
use super::library::LibraryEntry;
use super::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub user: Option<UserSummary>,
    pub content: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(alias = "gameId")]
    pub game_id: String,
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(default, alias = "reviewText")]
    pub review_text: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub game: Option<GameSummary>,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub user_game: Option<LibraryEntry>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Review {
    /// The score shown next to a review. It lives on the linked library entry;
    /// the review's own field is only a fallback.
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.user_game
            .as_ref()
            .and_then(|entry| entry.rating)
            .or(self.rating)
            .unwrap_or(0.0)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.review_text.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_prefers_library_entry() {
        let json = r#"{
            "id": "r1", "gameId": "g1", "userId": "u1", "rating": 3,
            "user_game": {"id": "ug1", "game_id": "g1", "status": "completed", "rating": 9}
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert!((review.rating() - 9.0).abs() < f64::EPSILON);
        assert_eq!(review.text(), "");
    }

    #[test]
    fn test_rating_defaults_to_zero() {
        let json = r#"{"id": "r1", "game_id": "g1", "user_id": "u1"}"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert!(review.rating().abs() < f64::EPSILON);
    }
}
