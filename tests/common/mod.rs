//! In-process stand-in for the gamedex API.

#![allow(dead_code)]

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use gamedex::client::ApiClient;
use gamedex::config::ApiConfig;
use gamedex::session::tokens::{MemoryTokenStore, TokenStore, store_token};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub type Reply = (StatusCode, Json<Value>);

/// Requests seen by the fake API, as `"METHOD /path"` plus the JSON body.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<(String, Value)>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, call: &str, body: Value) {
        self.calls.lock().unwrap().push((call.to_string(), body));
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == call)
            .count()
    }

    pub fn bodies(&self, call: &str) -> Vec<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| c == call)
            .map(|(_, b)| b.clone())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn client(base_url: &str) -> (ApiClient, Arc<MemoryTokenStore>) {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        ..ApiConfig::default()
    };
    let store = Arc::new(MemoryTokenStore::new());
    let client = ApiClient::new(&config, store.clone()).unwrap();
    (client, store)
}

/// An unsigned JWT for `sub` expiring `ttl_secs` from now.
pub fn jwt(sub: &str, ttl_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": sub, "exp": exp }).to_string());
    format!("{header}.{payload}.c2ln")
}

pub fn store(tokens: &MemoryTokenStore, name: &str, token: &str) {
    store_token(tokens as &dyn TokenStore, name, token).unwrap();
}

pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub fn ok(attributes: Value) -> Reply {
    (
        StatusCode::OK,
        Json(json!({ "result": "ok", "attributes": attributes })),
    )
}

pub fn page(items: Value, total: u64) -> Reply {
    (
        StatusCode::OK,
        Json(json!({
            "result": "ok",
            "attributes": items,
            "pagination": { "total": total, "page": 1 }
        })),
    )
}

pub fn error(status: StatusCode, code: &str) -> Reply {
    (status, Json(json!({ "result": "error", "error": code })))
}

pub fn user_json(id: &str, username: &str) -> Value {
    json!({ "id": id, "username": username, "email": format!("{username}@example.com"), "role": "member" })
}
