//! The authenticated user for the lifetime of a client.
//!
//! A [`Session`] is created by whoever owns the [`ApiClient`] and handed to
//! the code that needs to know who is logged in. It is filled once by
//! [`Session::bootstrap`] and emptied again on logout.

pub mod jwt;
pub mod tokens;

use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{Role, User};
use tokens::REFRESH_TOKEN;

#[derive(Debug, Default)]
pub struct Session {
    user: RwLock<Option<User>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(user: User) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|u| u.id.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether the logged-in user holds any of `roles`. False when anonymous.
    #[must_use]
    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|u| u.has_any_role(roles))
    }

    pub fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Resolves the logged-in user via `GET /auth/check`.
    ///
    /// An expired access token is refreshed first when a refresh token is
    /// still around. If the refresh is refused the stored tokens are dropped
    /// and the session stays anonymous; that is not an error.
    ///
    /// # Errors
    ///
    /// Transport failures and non-auth API errors are returned as-is.
    pub async fn bootstrap(&self, client: &ApiClient) -> Result<Option<User>, ClientError> {
        if !client.has_access_token() {
            if client.tokens().get(REFRESH_TOKEN).is_none() {
                debug!("No stored tokens, session is anonymous");
                self.set_user(None);
                return Ok(None);
            }

            if let Err(e) = client.refresh_access_token().await {
                warn!(error = %e, "Stored refresh token rejected");
                self.logout(client)?;
                return Ok(None);
            }
        }

        match client.check_auth().await {
            Ok(user) => {
                info!(user_id = %user.id, username = %user.username, "Session established");
                self.set_user(Some(user.clone()));
                Ok(Some(user))
            }
            Err(ClientError::Unauthenticated) => {
                self.set_user(None);
                Ok(None)
            }
            Err(e @ ClientError::RefreshFailed(_)) => {
                warn!(error = %e, "Session expired");
                self.logout(client)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Clears the stored tokens and the user.
    pub fn logout(&self, client: &ApiClient) -> Result<(), ClientError> {
        self.set_user(None);
        client.logout()
    }
}
