//! Keyed cache of fetched data with prefix invalidation.
//!
//! Reads go through [`QueryCache::get_or_fetch`]; after a successful
//! mutation the caller invalidates the keys it touched and the next read goes
//! back to the API, which stays the single source of truth.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Keys used by the built-in readers, so mutations know what to invalidate.
pub mod keys {
    use super::QueryKey;

    #[must_use]
    pub fn list(id: &str) -> QueryKey {
        QueryKey::new(["list", id])
    }

    #[must_use]
    pub fn lists() -> QueryKey {
        QueryKey::new(["lists"])
    }

    #[must_use]
    pub fn popular_lists() -> QueryKey {
        QueryKey::new(["lists", "popular"])
    }

    #[must_use]
    pub fn review(id: &str) -> QueryKey {
        QueryKey::new(["review", id])
    }

    #[must_use]
    pub fn reviews() -> QueryKey {
        QueryKey::new(["reviews"])
    }

    #[must_use]
    pub fn review_comments(id: &str) -> QueryKey {
        QueryKey::new(["review_comments", id])
    }

    #[must_use]
    pub fn game_library(game_id: &str) -> QueryKey {
        QueryKey::new(["game_status", game_id])
    }

    #[must_use]
    pub fn user() -> QueryKey {
        QueryKey::new(["user"])
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, Value>>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its result.
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(cached) = self.get::<T>(&key) {
            debug!(%key, "Query cache hit");
            return Ok(cached);
        }

        let value = fetch().await?;
        let json = serde_json::to_value(&value)?;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, json);
        Ok(value)
    }

    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Drops every entry whose key starts with `prefix`. Returns how many went.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        debug!(%prefix, removed, "Invalidated queries");
        removed
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
