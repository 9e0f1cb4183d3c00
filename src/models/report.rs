use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    User,
    Game,
    Review,
    Character,
    Staff,
    Company,
}

impl ReportType {
    /// Reasons offered for each kind of reported entity.
    #[must_use]
    pub const fn reasons(&self) -> &'static [&'static str] {
        match self {
            Self::Game => &["Inappropriate content", "Fake information", "Duplicated entry"],
            Self::User => &["Harassment", "Bot", "Spam"],
            Self::Review => &["Inappropriate language", "Biased review", "Spam"],
            Self::Character | Self::Staff | Self::Company => {
                &["Inaccurate information", "Inappropriate content"]
            }
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Game => "game",
            Self::Review => "review",
            Self::Character => "character",
            Self::Staff => "staff",
            Self::Company => "company",
        };
        f.write_str(s)
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "game" => Ok(Self::Game),
            "review" => Ok(Self::Review),
            "character" => Ok(Self::Character),
            "staff" => Ok(Self::Staff),
            "company" => Ok(Self::Company),
            other => Err(format!("unknown report type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Rejected,
}

/// A report as filled in by the user, before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportForm {
    pub report_type: ReportType,
    pub reported_entity_id: String,
    pub reason: Option<String>,
    pub content: String,
}
