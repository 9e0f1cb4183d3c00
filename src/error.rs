//! Errors raised while talking to the gamedex API.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by [`crate::client::ApiClient`] and the session layer.
///
/// Every variant carries owned strings so the error can be cloned and handed
/// to every caller waiting on a coalesced request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("No access token available")]
    Unauthenticated,

    #[error("Failed to refresh token: {0}")]
    RefreshFailed(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

impl ClientError {
    #[must_use]
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// True for failures that mean the caller has to log in again.
    #[must_use]
    pub const fn needs_login(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::RefreshFailed(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_login() {
        assert!(ClientError::Unauthenticated.needs_login());
        assert!(ClientError::RefreshFailed("expired".into()).needs_login());
        assert!(!ClientError::Api("nope".into()).needs_login());
    }

    #[test]
    fn test_http_status() {
        let err = ClientError::http(StatusCode::NOT_FOUND, "missing");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404: missing");
    }
}
