use super::{ApiClient, Auth};
use crate::envelope::Page;
use crate::error::ClientError;
use crate::models::Game;

/// Filters for `GET /games`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
}

impl GameQuery {
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            query.push(("order_by", order_by.clone()));
        }
        query
    }
}

impl ApiClient {
    /// `GET /games/{id}`, embedding the named collections.
    pub async fn get_game(&self, id: &str, includes: &[&str]) -> Result<Game, ClientError> {
        let query = if includes.is_empty() {
            Vec::new()
        } else {
            vec![("includes", includes.join(","))]
        };

        self.get_envelope::<Game>(&format!("games/{id}"), &query, Auth::None)
            .await?
            .into_attributes()
    }

    pub async fn search_games(&self, query: &GameQuery) -> Result<Page<Game>, ClientError> {
        self.get_envelope::<Vec<Game>>("games", &query.to_query(), Auth::None)
            .await?
            .into_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_query_skips_unset_fields() {
        let query = GameQuery {
            page: Some(2),
            ..GameQuery::search("hollow")
        };
        assert_eq!(
            query.to_query(),
            vec![("search", "hollow".to_string()), ("page", "2".to_string())]
        );
        assert!(GameQuery::default().to_query().is_empty());
    }
}
