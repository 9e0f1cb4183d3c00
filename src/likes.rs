//! Like/unlike for reviews and lists.
//!
//! Whether the current user likes something is read off the item's likes
//! collection. Toggling sends `POST` or `DELETE` to the item's `/like`
//! endpoint and then invalidates the cached queries showing the item; the
//! refreshed data comes from the API rather than a local guess.

use tracing::info;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::models::{GameList, Like, Review};
use crate::query::{QueryKey, keys};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget<'a> {
    Review(&'a str),
    List(&'a str),
}

impl LikeTarget<'_> {
    /// Cached queries that display this item's like count.
    #[must_use]
    pub fn affected_queries(&self) -> Vec<QueryKey> {
        match self {
            Self::Review(id) => vec![keys::review(id), keys::reviews()],
            Self::List(id) => vec![keys::list(id), keys::lists()],
        }
    }
}

pub trait Likeable {
    fn likes(&self) -> &[Like];

    fn like_target(&self) -> LikeTarget<'_>;

    fn like_count(&self) -> usize {
        self.likes().len()
    }
}

impl Likeable for Review {
    fn likes(&self) -> &[Like] {
        &self.likes
    }

    fn like_target(&self) -> LikeTarget<'_> {
        LikeTarget::Review(&self.id)
    }
}

impl Likeable for GameList {
    fn likes(&self) -> &[Like] {
        &self.likes
    }

    fn like_target(&self) -> LikeTarget<'_> {
        LikeTarget::List(&self.id)
    }
}

#[must_use]
pub fn is_liked_by(likes: &[Like], user_id: &str) -> bool {
    likes.iter().any(|like| like.user_id == user_id)
}

/// Which request a toggle sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Liked,
    Unliked,
}

/// Likes `item` if the session user has not liked it yet, unlikes it otherwise.
///
/// # Errors
///
/// [`ClientError::Unauthenticated`] for an anonymous session; otherwise
/// whatever the like request returned. Caches are only invalidated on success.
pub async fn toggle_like<T: Likeable + ?Sized>(
    client: &ApiClient,
    session: &Session,
    item: &T,
) -> Result<LikeAction, ClientError> {
    let user_id = session.user_id().ok_or(ClientError::Unauthenticated)?;
    let target = item.like_target();

    let action = if is_liked_by(item.likes(), &user_id) {
        match target {
            LikeTarget::Review(id) => client.unlike_review(id).await?,
            LikeTarget::List(id) => client.unlike_list(id).await?,
        }
        LikeAction::Unliked
    } else {
        match target {
            LikeTarget::Review(id) => client.like_review(id).await?,
            LikeTarget::List(id) => client.like_list(id).await?,
        }
        LikeAction::Liked
    };

    for key in target.affected_queries() {
        client.cache().invalidate(&key);
    }

    info!(?target, ?action, "Toggled like");
    Ok(action)
}
