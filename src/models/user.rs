use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::library::LibraryEntry;
use super::list::GameList;
use super::review::Review;

/// Account roles. Only used to gate and style what is displayed; the API
/// enforces the actual permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Developer,
    GlobalModerator,
    NewsModerator,
    ForumModerator,
    Staff,
    Vip,
    PowerContributor,
    Supporter,
    Member,
    Unverified,
    Guest,
    Banned,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Developer => "developer",
            Self::GlobalModerator => "global_moderator",
            Self::NewsModerator => "news_moderator",
            Self::ForumModerator => "forum_moderator",
            Self::Staff => "staff",
            Self::Vip => "vip",
            Self::PowerContributor => "power_contributor",
            Self::Supporter => "supporter",
            Self::Member => "member",
            Self::Unverified => "unverified",
            Self::Guest => "guest",
            Self::Banned => "banned",
        }
    }

    /// Badge colour for profile pages.
    #[must_use]
    pub const fn color(&self) -> &'static str {
        match self {
            Self::Admin | Self::Banned => "#D32F2F",
            Self::Developer => "#F57C00",
            Self::GlobalModerator => "#388E3C",
            Self::NewsModerator => "#1976D2",
            Self::ForumModerator => "#0288D1",
            Self::Staff => "#7B1FA2",
            Self::Vip => "#FBC02D",
            Self::PowerContributor => "#0097A7",
            Self::Supporter => "#C2185B",
            Self::Member => "#689F38",
            Self::Unverified => "#757575",
            Self::Guest => "#BDBDBD",
        }
    }

    /// Whether a badge in [`Role::color`] needs dark text to stay readable.
    #[must_use]
    pub fn prefers_dark_text(&self) -> bool {
        let hex = self.color().trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            f64::from(u8::from_str_radix(&hex[range], 16).unwrap_or(0))
        };
        let luminance =
            (0.299 * channel(0..2) + 0.587 * channel(2..4) + 0.114 * channel(4..6)) / 255.0;
        luminance > 0.5
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.as_str().replace('_', " ");
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRef {
    pub name: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: RoleRef,
}

/// The author block embedded in reviews, comments and lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub roles: Vec<RoleAssignment>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_games: Vec<LibraryEntry>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub lists: Vec<GameList>,
}

const fn default_role() -> Role {
    Role::Member
}

impl User {
    /// True when the user holds any of `roles`, either as the primary role or
    /// through a role assignment.
    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role) || self.roles.iter().any(|a| roles.contains(&a.role.name))
    }

    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::GlobalModerator.to_string(), "Global moderator");
        assert_eq!(Role::Admin.to_string(), "Admin");
    }

    #[test]
    fn test_role_text_contrast() {
        assert!(Role::Guest.prefers_dark_text());
        assert!(!Role::Staff.prefers_dark_text());
    }

    #[test]
    fn test_has_any_role_checks_assignments() {
        let json = r#"{
            "id": "u1", "username": "ana", "role": "member",
            "roles": [{"role": {"name": "forum_moderator"}}]
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.has_any_role(&[Role::ForumModerator, Role::Admin]));
        assert!(user.has_any_role(&[Role::Member]));
        assert!(!user.has_any_role(&[Role::Admin]));
    }
}
