//! HTTP client for the gamedex API.
//!
//! Every call goes through [`ApiClient`], which attaches the bearer token,
//! refreshes it once on a 401, deduplicates concurrent identical GETs and
//! decodes the response envelope. Resource-specific calls live in the
//! submodules as further `impl ApiClient` blocks.

pub mod auth;
pub mod games;
pub mod inflight;
pub mod library;
pub mod lists;
pub mod reviews;
pub mod users;

use futures::FutureExt;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::envelope::{self, Envelope};
use crate::error::ClientError;
use crate::models::TokenPair;
use crate::query::QueryCache;
use crate::session::tokens::{ACCESS_TOKEN, REFRESH_TOKEN, TokenStore, store_token};
use inflight::InFlight;

pub use games::GameQuery;
pub use lists::ListQuery;
pub use reviews::ReviewQuery;

/// Whether a request carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Never send a token.
    None,
    /// Send the token when one is stored; anonymous otherwise.
    Optional,
    /// Fail with [`ClientError::Unauthenticated`] when no token is stored.
    Required,
}

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

struct Inner {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    inflight: InFlight<RawResponse, ClientError>,
    cache: QueryCache,
}

/// Cheap to clone; clones share the token store, cache and in-flight map.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Builds a client for `config.base_url` using `tokens` for credentials.
    ///
    /// # Errors
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)?;

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http = builder.build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                tokens,
                inflight: InFlight::new(),
                cache: QueryCache::new(),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    #[must_use]
    pub fn tokens(&self) -> &dyn TokenStore {
        self.inner.tokens.as_ref()
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.tokens().get(ACCESS_TOKEN).is_some()
    }

    /// Joins `path` onto the base URL and appends the query pairs.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        ))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }

    /// Issues a request with the stored access token and, if the API answers
    /// 401, refreshes the token and retries exactly once.
    ///
    /// # Errors
    ///
    /// * [`ClientError::Unauthenticated`] when no access token is stored; no
    ///   request is made.
    /// * [`ClientError::RefreshFailed`] when the 401 could not be recovered;
    ///   the original request is not retried.
    pub async fn fetch_with_auth(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<RawResponse, ClientError> {
        let token = self
            .tokens()
            .get(ACCESS_TOKEN)
            .ok_or(ClientError::Unauthenticated)?;

        let response = self.send(method.clone(), url.clone(), body, Some(&token)).await?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(%url, "Access token rejected, refreshing");
        let fresh = self.refresh_access_token().await?;
        self.send(method, url, body, Some(&fresh)).await
    }

    /// Exchanges the stored refresh token for a new access token and stores it.
    ///
    /// # Errors
    ///
    /// Any failure, including a missing refresh token, is reported as
    /// [`ClientError::RefreshFailed`].
    pub async fn refresh_access_token(&self) -> Result<String, ClientError> {
        let refresh = self
            .tokens()
            .get(REFRESH_TOKEN)
            .ok_or_else(|| ClientError::RefreshFailed("no refresh token stored".to_string()))?;

        let url = self.url("auth/refresh", &[])?;
        let body = json!({ "refreshToken": refresh });
        let response = self
            .send(Method::POST, url, Some(&body), None)
            .await
            .map_err(|e| ClientError::RefreshFailed(e.to_string()))?;

        let pair = envelope::decode::<TokenPair>(response.status, &response.body)
            .and_then(Envelope::into_attributes)
            .map_err(|e| ClientError::RefreshFailed(e.to_string()))?;

        let access = pair
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::RefreshFailed("No access token in response".to_string()))?;

        if let Err(e) = store_token(self.tokens(), ACCESS_TOKEN, &access) {
            warn!(error = %e, "Could not store refreshed access token");
        }

        info!("Access token refreshed");
        Ok(access)
    }

    /// Runs a request with the given auth mode. Concurrent identical GETs
    /// share a single round trip.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        auth: Auth,
    ) -> Result<RawResponse, ClientError> {
        if method != Method::GET {
            return self.dispatch(method, url, body.as_ref(), auth).await;
        }

        let key = format!("{auth:?} GET {url}");
        let this = self.clone();
        self.inner
            .inflight
            .run(key, move || {
                async move { this.dispatch(Method::GET, url, None, auth).await }.boxed()
            })
            .await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        auth: Auth,
    ) -> Result<RawResponse, ClientError> {
        match auth {
            Auth::None => self.send(method, url, body, None).await,
            Auth::Required => self.fetch_with_auth(method, url, body).await,
            Auth::Optional if self.has_access_token() => {
                self.fetch_with_auth(method, url, body).await
            }
            Auth::Optional => self.send(method, url, body, None).await,
        }
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<RawResponse, ClientError> {
        debug!(%method, %url, authenticated = token.is_some(), "Sending request");

        let mut request = self.inner.http.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!(%status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }

    pub(crate) async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: Auth,
    ) -> Result<Envelope<T>, ClientError> {
        let url = self.url(path, query)?;
        let response = self.execute(Method::GET, url, None, auth).await?;
        envelope::decode(response.status, &response.body)
    }

    pub(crate) async fn send_envelope<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<Envelope<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path, &[])?;
        let body = body.map(serde_json::to_value).transpose()?;
        let response = self.execute(method, url, body, auth).await?;
        envelope::decode(response.status, &response.body)
    }

    pub(crate) async fn send_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path, &[])?;
        let body = body.map(serde_json::to_value).transpose()?;
        let response = self.execute(method, url, body, auth).await?;
        envelope::decode_unit(response.status, &response.body)
    }
}
