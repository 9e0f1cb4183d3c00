use reqwest::Method;
use serde::Serialize;
use tracing::{info, warn};

use super::{ApiClient, Auth};
use crate::error::ClientError;
use crate::models::{TokenPair, User};
use crate::session::tokens::{ACCESS_TOKEN, REFRESH_TOKEN, store_token};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

const LOGIN_RETRY_MESSAGE: &str = "Could not log you in this time, try again.";

impl ApiClient {
    /// Logs in and stores both tokens.
    ///
    /// # Errors
    ///
    /// Returns the API's (translated) message when the credentials are
    /// rejected, or a generic retry message when the tokens cannot be stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let pair = self
            .send_envelope::<TokenPair, _>(
                Method::POST,
                "auth/login",
                Some(&Credentials { email, password }),
                Auth::None,
            )
            .await?
            .into_attributes()?;

        self.store_pair(&pair)?;
        info!(email, "Logged in");
        Ok(())
    }

    /// Creates an account, then logs in with the same credentials.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        self.send_envelope::<serde_json::Value, _>(
            Method::POST,
            "auth/register",
            Some(&Registration {
                username,
                email,
                password,
            }),
            Auth::None,
        )
        .await?
        .into_optional()?;

        info!(username, "Registered account");
        self.login(email, password).await
    }

    /// Returns the user the stored access token belongs to.
    pub async fn check_auth(&self) -> Result<User, ClientError> {
        self.get_envelope::<User>("auth/check", &[], Auth::Required)
            .await?
            .into_attributes()
    }

    /// Forgets both tokens and every cached query.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.tokens().clear()?;
        self.cache().clear();
        info!("Logged out");
        Ok(())
    }

    fn store_pair(&self, pair: &TokenPair) -> Result<(), ClientError> {
        let stored = [
            (ACCESS_TOKEN, pair.access_token.as_deref()),
            (REFRESH_TOKEN, pair.refresh_token.as_deref()),
        ]
        .into_iter()
        .try_for_each(|(name, token)| {
            store_token(self.tokens(), name, token.unwrap_or_default())
        });

        stored.map_err(|e| {
            warn!(error = %e, "Login returned unusable tokens");
            ClientError::Api(LOGIN_RETRY_MESSAGE.to_string())
        })
    }
}
