use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::review::Review;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Released,
    Alpha,
    Beta,
    EarlyAccess,
    Offline,
    Cancelled,
    Rumored,
    Delisted,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Released => "Released",
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
            Self::EarlyAccess => "Early Access",
            Self::Offline => "Offline",
            Self::Cancelled => "Cancelled",
            Self::Rumored => "Rumored",
            Self::Delisted => "Delisted",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Draft,
    Submitted,
    Published,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_developer: bool,
    #[serde(default)]
    pub is_publisher: bool,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A game page. Collections are only present when requested via `includes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default, alias = "alternativeTitles")]
    pub alternative_titles: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub state: Option<GameState>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub status: Option<GameStatus>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
    #[serde(default, alias = "originalLanguage")]
    pub original_language: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Game {
    pub fn developers(&self) -> impl Iterator<Item = &Company> {
        self.companies.iter().filter(|c| c.is_developer)
    }

    pub fn publishers(&self) -> impl Iterator<Item = &Company> {
        self.companies.iter().filter(|c| c.is_publisher)
    }

    /// Release year as a number, when the API sent something parsable.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }
}

/// The trimmed game record embedded in list entries and reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            id: Some(game.id.clone()),
            title: game.title.clone(),
            cover_url: game.cover_url.clone(),
            year: game.year.clone(),
        }
    }
}
