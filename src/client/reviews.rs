use reqwest::Method;
use serde::Serialize;
use tracing::info;

use super::{ApiClient, Auth};
use crate::envelope::Page;
use crate::error::ClientError;
use crate::models::{Comment, Review};
use crate::query::keys;

/// Filters for `GET /reviews`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewQuery {
    pub game_id: Option<String>,
    pub user_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub order_by: Option<String>,
    pub includes: Vec<String>,
    pub library_count: bool,
}

impl ReviewQuery {
    #[must_use]
    pub fn for_game(game_id: impl Into<String>) -> Self {
        Self {
            game_id: Some(game_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn including<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(includes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(game_id) = &self.game_id {
            query.push(("game_id", game_id.clone()));
        }
        if let Some(user_id) = &self.user_id {
            query.push(("user_id", user_id.clone()));
        }
        if self.library_count {
            query.push(("library_count", "true".to_string()));
        }
        if let Some(order_by) = &self.order_by {
            query.push(("order_by", order_by.clone()));
        }
        if !self.includes.is_empty() {
            query.push(("includes", self.includes.join(",")));
        }
        query
    }
}

#[derive(Debug, Serialize)]
struct ReviewBody<'a> {
    review_text: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    content: &'a str,
}

impl ApiClient {
    pub async fn list_reviews(&self, query: &ReviewQuery) -> Result<Page<Review>, ClientError> {
        self.get_envelope::<Vec<Review>>("reviews", &query.to_query(), Auth::Optional)
            .await?
            .into_page()
    }

    pub async fn get_review(&self, id: &str) -> Result<Review, ClientError> {
        self.cache()
            .get_or_fetch(keys::review(id), || async {
                self.get_envelope::<Review>(&format!("reviews/{id}"), &[], Auth::Optional)
                    .await?
                    .into_attributes()
            })
            .await
    }

    /// The current user's review of a game, if they wrote one.
    pub async fn find_user_review(
        &self,
        game_id: &str,
        user_id: &str,
    ) -> Result<Option<Review>, ClientError> {
        let query = ReviewQuery {
            user_id: Some(user_id.to_string()),
            ..ReviewQuery::for_game(game_id)
        };
        let page = self
            .get_envelope::<Vec<Review>>("reviews", &query.to_query(), Auth::Required)
            .await?
            .into_page()?;
        Ok(page.items.into_iter().next())
    }

    /// `POST /reviews/{game_id}`.
    pub async fn create_review(&self, game_id: &str, text: &str) -> Result<Option<Review>, ClientError> {
        let review = self
            .send_envelope::<Review, _>(
                Method::POST,
                &format!("reviews/{game_id}"),
                Some(&ReviewBody { review_text: text }),
                Auth::Required,
            )
            .await?
            .into_optional()?;

        self.cache().invalidate(&keys::reviews());
        info!(game_id, "Review added");
        Ok(review)
    }

    /// `PUT /reviews/{id}`.
    pub async fn update_review(&self, id: &str, text: &str) -> Result<Option<Review>, ClientError> {
        let review = self
            .send_envelope::<Review, _>(
                Method::PUT,
                &format!("reviews/{id}"),
                Some(&ReviewBody { review_text: text }),
                Auth::Required,
            )
            .await?
            .into_optional()?;

        self.cache().invalidate(&keys::reviews());
        self.cache().invalidate(&keys::review(id));
        info!(review_id = id, "Review updated");
        Ok(review)
    }

    pub async fn delete_review(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::DELETE, &format!("reviews/{id}"), None, Auth::Required)
            .await?;

        self.cache().invalidate(&keys::reviews());
        self.cache().invalidate(&keys::review(id));
        info!(review_id = id, "Review deleted");
        Ok(())
    }

    pub async fn like_review(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::POST, &format!("reviews/{id}/like"), None, Auth::Required)
            .await
    }

    pub async fn unlike_review(&self, id: &str) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::DELETE, &format!("reviews/{id}/like"), None, Auth::Required)
            .await
    }

    pub async fn list_comments(&self, review_id: &str) -> Result<Vec<Comment>, ClientError> {
        self.cache()
            .get_or_fetch(keys::review_comments(review_id), || async {
                let page = self
                    .get_envelope::<Vec<Comment>>(
                        &format!("reviews/{review_id}/comments"),
                        &[],
                        Auth::Optional,
                    )
                    .await?
                    .into_page()?;
                Ok(page.items)
            })
            .await
    }

    /// `POST /reviews/{id}/comment`.
    pub async fn add_comment(&self, review_id: &str, content: &str) -> Result<Option<Comment>, ClientError> {
        let comment = self
            .send_envelope::<Comment, _>(
                Method::POST,
                &format!("reviews/{review_id}/comment"),
                Some(&CommentBody { content }),
                Auth::Required,
            )
            .await?
            .into_optional()?;

        self.cache().invalidate(&keys::review_comments(review_id));
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_query_matches_feed_request() {
        let query = ReviewQuery {
            limit: Some(6),
            order_by: Some("created_at asc".to_string()),
            ..ReviewQuery::for_game("g1")
        }
        .including(["platform", "user", "comments", "likes"]);

        assert_eq!(
            query.to_query(),
            vec![
                ("limit", "6".to_string()),
                ("game_id", "g1".to_string()),
                ("order_by", "created_at asc".to_string()),
                ("includes", "platform,user,comments,likes".to_string()),
            ]
        );
    }

    #[test]
    fn test_library_count_flag() {
        let query = ReviewQuery {
            library_count: true,
            ..ReviewQuery::by_user("u1")
        };
        assert!(query.to_query().contains(&("library_count", "true".to_string())));
    }
}
