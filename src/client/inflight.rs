//! Deduplication of concurrent identical requests.
//!
//! The first caller for a key starts the request; callers arriving while it
//! is still running await the same shared future. The entry is dropped as
//! soon as the request settles, so nothing is cached past that point.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

type SharedRequest<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

pub struct InFlight<T, E>
where
    T: Clone,
    E: Clone,
{
    pending: Mutex<HashMap<String, SharedRequest<T, E>>>,
}

impl<T, E> Default for InFlight<T, E>
where
    T: Clone,
    E: Clone,
{
    fn default() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }
}

impl<T, E> InFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the request produced by `start`, or joins the one already running
    /// under `key`.
    pub async fn run<F>(&self, key: String, start: F) -> Result<T, E>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, E>>,
    {
        let request = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = pending.get(&key) {
                trace!(%key, "Joining in-flight request");
                existing.clone()
            } else {
                let request = start().shared();
                pending.insert(key.clone(), request.clone());
                request
            }
        };

        let result = request.clone().await;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending
            .get(&key)
            .is_some_and(|current| current.ptr_eq(&request))
        {
            pending.remove(&key);
        }

        result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
