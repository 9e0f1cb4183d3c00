use reqwest::Method;
use serde::Serialize;
use tracing::info;

use super::{ApiClient, Auth};
use crate::error::ClientError;
use crate::models::User;
use crate::query::keys;

/// Body for `PUT /user`. Password fields are only sent when changing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub email: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "confirmPassword", skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

impl ApiClient {
    /// `GET /user/{id}`: a public profile with its library, reviews and lists.
    pub async fn get_user(&self, id: &str) -> Result<User, ClientError> {
        self.get_envelope::<User>(&format!("user/{id}"), &[], Auth::None)
            .await?
            .into_attributes()
    }

    pub async fn update_user(&self, update: &ProfileUpdate) -> Result<Option<User>, ClientError> {
        let user = self
            .send_envelope::<User, _>(Method::PUT, "user", Some(update), Auth::Required)
            .await?
            .into_optional()?;

        self.cache().invalidate(&keys::user());
        info!(username = %update.username, "Profile updated");
        Ok(user)
    }
}
