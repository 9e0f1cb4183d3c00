//! Persistence for the access and refresh tokens.
//!
//! Tokens are kept under fixed names with an expiry derived from the JWT
//! `exp` claim. A token past its expiry reads back as absent, the same way an
//! expired browser cookie disappears.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

use super::jwt::decode_claims;
use crate::error::ClientError;

pub const ACCESS_TOKEN: &str = "gd:accessToken";
pub const REFRESH_TOKEN: &str = "gd:refreshToken";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

pub trait TokenStore: Send + Sync {
    /// Returns the raw stored token, expired or not.
    fn load(&self, name: &str) -> Option<StoredToken>;

    fn save(&self, name: &str, token: StoredToken) -> Result<(), ClientError>;

    fn remove(&self, name: &str) -> Result<(), ClientError>;

    /// Returns the token value if it exists and has not expired.
    fn get(&self, name: &str) -> Option<String> {
        self.load(name)
            .filter(|t| !t.is_expired(Utc::now()))
            .map(|t| t.value)
    }

    fn clear(&self) -> Result<(), ClientError> {
        self.remove(ACCESS_TOKEN)?;
        self.remove(REFRESH_TOKEN)
    }
}

/// Stores `token` under `name`, expiring when the token's `exp` claim does.
///
/// The lifetime is counted in whole seconds from now and floored at zero, so
/// an already-expired token is stored but never read back.
///
/// # Errors
///
/// Fails if the token cannot be decoded, has no `exp` claim, its `exp` is
/// out of range for a timestamp, or the store cannot persist it.
pub fn store_token(store: &dyn TokenStore, name: &str, token: &str) -> Result<(), ClientError> {
    if token.is_empty() {
        return Err(ClientError::InvalidToken("token not found".to_string()));
    }

    let claims = decode_claims(token)?;
    let exp = claims
        .exp
        .ok_or_else(|| ClientError::InvalidToken("token has no exp claim".to_string()))?;

    let now = Utc::now();
    let expires_at = exp
        .checked_sub(now.timestamp())
        .map(|remaining| remaining.max(0))
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| ClientError::InvalidToken(format!("exp claim {exp} is out of range")))?;

    debug!(name, %expires_at, "Storing token");
    store.save(
        name,
        StoredToken {
            value: token.to_string(),
            expires_at,
        },
    )
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, StoredToken>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, name: &str) -> Option<StoredToken> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn save(&self, name: &str, token: StoredToken) -> Result<(), ClientError> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), token);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ClientError> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default)]
    tokens: BTreeMap<String, StoredToken>,
}

/// A TOML file holding the tokens between CLI invocations.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> TokenFile {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return TokenFile::default();
        };

        toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Ignoring unreadable token file");
            TokenFile::default()
        })
    }

    fn write_file(&self, file: &TokenFile) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
        }

        let content =
            toml::to_string_pretty(file).map_err(|e| ClientError::Storage(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| ClientError::Storage(e.to_string()))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, name: &str) -> Option<StoredToken> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        self.read_file().tokens.remove(name)
    }

    fn save(&self, name: &str, token: StoredToken) -> Result<(), ClientError> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut file = self.read_file();
        file.tokens.insert(name.to_string(), token);
        self.write_file(&file)
    }

    fn remove(&self, name: &str) -> Result<(), ClientError> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut file = self.read_file();
        if file.tokens.remove(name).is_some() {
            self.write_file(&file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::jwt::encode_for_test;
    use serde_json::json;

    fn token_expiring_in(seconds: i64) -> String {
        encode_for_test(&json!({"exp": Utc::now().timestamp() + seconds}))
    }

    #[test]
    fn test_store_token_uses_exp_claim() {
        let store = MemoryTokenStore::new();
        let token = token_expiring_in(3600);

        store_token(&store, ACCESS_TOKEN, &token).unwrap();

        assert_eq!(store.get(ACCESS_TOKEN), Some(token));
        let stored = store.load(ACCESS_TOKEN).unwrap();
        let remaining = stored.expires_at - Utc::now();
        assert!(remaining > Duration::minutes(59));
        assert!(remaining <= Duration::minutes(60));
    }

    #[test]
    fn test_expired_token_reads_as_absent() {
        let store = MemoryTokenStore::new();
        store_token(&store, ACCESS_TOKEN, &token_expiring_in(-60)).unwrap();

        assert!(store.load(ACCESS_TOKEN).is_some());
        assert_eq!(store.get(ACCESS_TOKEN), None);
    }

    #[test]
    fn test_token_without_exp_is_rejected() {
        let store = MemoryTokenStore::new();
        let token = encode_for_test(&json!({"sub": "u1"}));
        assert!(matches!(
            store_token(&store, ACCESS_TOKEN, &token),
            Err(ClientError::InvalidToken(_))
        ));
        assert!(store_token(&store, ACCESS_TOKEN, "").is_err());
    }

    #[test]
    fn test_out_of_range_exp_is_rejected() {
        let store = MemoryTokenStore::new();

        for exp in [100_000_000_000_000_000_i64, i64::MAX, i64::MIN] {
            let token = encode_for_test(&json!({ "exp": exp }));
            assert!(matches!(
                store_token(&store, ACCESS_TOKEN, &token),
                Err(ClientError::InvalidToken(_))
            ));
        }
        assert!(store.load(ACCESS_TOKEN).is_none());
    }

    #[test]
    fn test_clear_removes_both_tokens() {
        let store = MemoryTokenStore::new();
        store_token(&store, ACCESS_TOKEN, &token_expiring_in(60)).unwrap();
        store_token(&store, REFRESH_TOKEN, &token_expiring_in(600)).unwrap();

        store.clear().unwrap();

        assert_eq!(store.get(ACCESS_TOKEN), None);
        assert_eq!(store.get(REFRESH_TOKEN), None);
    }

    #[test]
    fn test_file_store_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!(
            "gamedex-tokens-{}-{}.toml",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let token = token_expiring_in(120);

        {
            let store = FileTokenStore::new(&path);
            store_token(&store, REFRESH_TOKEN, &token).unwrap();
        }

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.get(REFRESH_TOKEN), Some(token));

        reopened.remove(REFRESH_TOKEN).unwrap();
        assert_eq!(reopened.get(REFRESH_TOKEN), None);

        let _ = std::fs::remove_file(&path);
    }
}
