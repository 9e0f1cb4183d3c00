//! Reads the claims of an access/refresh token without verifying it.
//!
//! Signature checks belong to the API; the client only needs `exp` to decide
//! how long to keep a token around.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ClientError;

#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,

    #[serde(default)]
    pub sub: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Decodes the payload segment of a JWT.
///
/// # Errors
///
/// Returns [`ClientError::InvalidToken`] if the token is not three
/// dot-separated segments or the payload is not base64url JSON.
pub fn decode_claims(token: &str) -> Result<Claims, ClientError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ClientError::InvalidToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ClientError::InvalidToken(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::InvalidToken(format!("payload is not JSON: {e}")))
}

#[cfg(test)]
pub(crate) fn encode_for_test(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2ln")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_claims() {
        let token = encode_for_test(&json!({"exp": 1_900_000_000, "sub": "u1", "role": "member"}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(1_900_000_000));
        assert_eq!(claims.sub.as_deref(), Some("u1"));
        assert_eq!(claims.extra["role"], "member");
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_900_000_000);
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!(decode_claims("not-a-jwt").is_err());
        assert!(decode_claims("a.b.c.d").is_err());
        assert!(decode_claims("a.!!!.c").is_err());
    }
}
