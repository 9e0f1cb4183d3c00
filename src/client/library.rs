use reqwest::Method;
use tracing::info;

use super::{ApiClient, Auth};
use crate::error::ClientError;
use crate::models::{LibraryEntry, LibraryForm};
use crate::query::keys;

impl ApiClient {
    /// The current user's library entry for a game, if there is one.
    pub async fn get_library_entry(&self, game_id: &str) -> Result<Option<LibraryEntry>, ClientError> {
        let envelope = self
            .get_envelope::<LibraryEntry>(&format!("games/{game_id}/library"), &[], Auth::Required)
            .await;

        match envelope {
            Ok(envelope) => envelope.into_optional(),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Adds the game to the library (`POST`) or updates the existing entry (`PUT`).
    pub async fn save_library_entry(
        &self,
        game_id: &str,
        form: &LibraryForm,
        exists: bool,
    ) -> Result<Option<LibraryEntry>, ClientError> {
        let method = if exists { Method::PUT } else { Method::POST };
        let entry = self
            .send_envelope::<LibraryEntry, _>(
                method,
                &format!("games/{game_id}/library"),
                Some(form),
                Auth::Required,
            )
            .await?
            .into_optional()?;

        self.cache().invalidate(&keys::game_library(game_id));
        info!(game_id, exists, "Saved library entry");
        Ok(entry)
    }

    pub async fn remove_library_entry(&self, game_id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(
            Method::DELETE,
            &format!("games/{game_id}/library"),
            None,
            Auth::Required,
        )
        .await?;

        self.cache().invalidate(&keys::game_library(game_id));
        info!(game_id, "Removed game from library");
        Ok(())
    }
}
