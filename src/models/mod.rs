pub mod game;
pub mod library;
pub mod list;
pub mod report;
pub mod review;
pub mod user;

pub use game::{Game, GameState, GameStatus, GameSummary};
pub use library::{LibraryEntry, LibraryForm};
pub use list::{GameList, ListEntry, ListOrdering};
pub use report::{ReportForm, ReportStatus, ReportType};
pub use review::{Comment, Like, Review};
pub use user::{Role, User, UserSummary};

use serde::Deserialize;

/// The token pair returned by login, register and refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}
