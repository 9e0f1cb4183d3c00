use reqwest::Method;
use tracing::info;

use super::{ApiClient, Auth};
use crate::editor::ListDraft;
use crate::envelope::Page;
use crate::error::ClientError;
use crate::models::GameList;
use crate::query::keys;

/// Filters for `GET /list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub order_by: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
            order_by: String::new(),
        }
    }
}

impl ListQuery {
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("includes", "games,likes,user".to_string()),
            ("order_by", self.order_by.clone()),
            ("search", self.search.clone()),
        ]
    }
}

impl ApiClient {
    /// `GET /list/{id}`. The token is sent when present so owners can read
    /// their private lists.
    pub async fn get_list(&self, id: &str) -> Result<GameList, ClientError> {
        self.cache()
            .get_or_fetch(keys::list(id), || async {
                self.get_envelope::<GameList>(&format!("list/{id}"), &[], Auth::Optional)
                    .await?
                    .into_attributes()
            })
            .await
    }

    pub async fn browse_lists(&self, query: &ListQuery) -> Result<Page<GameList>, ClientError> {
        self.get_envelope::<Vec<GameList>>("list", &query.to_query(), Auth::Optional)
            .await?
            .into_page()
    }

    pub async fn popular_lists(&self) -> Result<Vec<GameList>, ClientError> {
        self.cache()
            .get_or_fetch(keys::popular_lists(), || async {
                let page = self
                    .get_envelope::<Vec<GameList>>("list/popular", &[], Auth::None)
                    .await?
                    .into_page()?;
                Ok(page.items)
            })
            .await
    }

    /// `POST /list` with the whole draft.
    pub async fn create_list(&self, draft: &ListDraft) -> Result<Option<GameList>, ClientError> {
        let list = self
            .send_envelope::<GameList, _>(Method::POST, "list", Some(draft), Auth::Required)
            .await?
            .into_optional()?;

        self.cache().invalidate(&keys::lists());
        info!(name = %draft.name, games = draft.games.len(), "List created");
        Ok(list)
    }

    /// `PUT /list/{id}` replacing the list with the draft.
    pub async fn update_list(&self, id: &str, draft: &ListDraft) -> Result<Option<GameList>, ClientError> {
        let list = self
            .send_envelope::<GameList, _>(Method::PUT, &format!("list/{id}"), Some(draft), Auth::Required)
            .await?
            .into_optional()?;

        self.cache().invalidate(&keys::list(id));
        self.cache().invalidate(&keys::lists());
        info!(list_id = id, games = draft.games.len(), "List updated");
        Ok(list)
    }

    pub async fn like_list(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::POST, &format!("list/{id}/like"), None, Auth::Required)
            .await
    }

    pub async fn unlike_list(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::DELETE, &format!("list/{id}/like"), None, Auth::Required)
            .await
    }
}
