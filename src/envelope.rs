//! The uniform response wrapper used by every API call.
//!
//! Responses look like `{ attributes, pagination?, result, message?, error? }`.
//! They are decoded into typed values here, before anything reaches
//! application state; a malformed body is a [`ClientError::Decode`], never a
//! half-filled record.

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ClientError;

/// API error codes with a friendlier message than the raw code.
const ERROR_MESSAGES: &[(&str, &str)] = &[("AUTH_0004", "Email or password invalid")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pagination {
    pub total: u64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub attributes: Option<T>,

    pub pagination: Option<Pagination>,

    pub result: ResultKind,

    pub message: Option<String>,

    pub error: Option<String>,
}

/// A decoded list response together with its pagination block.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.pagination
            .as_ref()
            .map_or(self.items.len() as u64, |p| p.total)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Envelope<T> {
    fn check(&self) -> Result<(), ClientError> {
        match self.result {
            ResultKind::Ok => Ok(()),
            ResultKind::Error => Err(ClientError::Api(error_message(
                self.error.as_deref(),
                self.message.as_deref(),
            ))),
        }
    }

    /// Returns the attributes of a successful envelope.
    ///
    /// # Errors
    ///
    /// Fails when the envelope reports `result: "error"` or carries no attributes.
    pub fn into_attributes(self) -> Result<T, ClientError> {
        self.check()?;
        self.attributes
            .ok_or_else(|| ClientError::Decode("response has no attributes".to_string()))
    }

    /// Like [`Envelope::into_attributes`] but an absent payload is `None`.
    pub fn into_optional(self) -> Result<Option<T>, ClientError> {
        self.check()?;
        Ok(self.attributes)
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn into_page(self) -> Result<Page<T>, ClientError> {
        self.check()?;
        Ok(Page {
            items: self.attributes.unwrap_or_default(),
            pagination: self.pagination,
        })
    }
}

/// Maps an API error code (or message) to the text shown to the user.
#[must_use]
pub fn error_message(code: Option<&str>, message: Option<&str>) -> String {
    if let Some(code) = code {
        if let Some((_, text)) = ERROR_MESSAGES.iter().find(|(c, _)| *c == code) {
            return (*text).to_string();
        }
        return code.to_string();
    }

    message.unwrap_or("Unknown error").to_string()
}

/// Decodes a response body into an envelope, turning non-2xx statuses into
/// [`ClientError::Http`] with the best message the body offers.
///
/// # Errors
///
/// Returns an error for non-success statuses and for bodies that do not match
/// the envelope shape.
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<Envelope<T>, ClientError> {
    if !status.is_success() {
        return Err(failure(status, body));
    }

    serde_json::from_slice(body).map_err(ClientError::from)
}

/// Checks a mutation response that carries no useful payload.
///
/// An empty body is accepted; a body that parses as an envelope must report
/// `result: "ok"`.
pub fn decode_unit(status: StatusCode, body: &[u8]) -> Result<(), ClientError> {
    if !status.is_success() {
        return Err(failure(status, body));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    match serde_json::from_slice::<Envelope<Value>>(body) {
        Ok(envelope) => envelope.check(),
        Err(_) => Ok(()),
    }
}

fn failure(status: StatusCode, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<Envelope<Value>>(body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string()
        },
        |envelope| error_message(envelope.error.as_deref(), envelope.message.as_deref()),
    );

    ClientError::http(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn test_decode_ok_envelope() {
        let body = br#"{"attributes":{"id":"g1"},"result":"ok"}"#;
        let item = decode::<Item>(StatusCode::OK, body)
            .unwrap()
            .into_attributes()
            .unwrap();
        assert_eq!(item, Item { id: "g1".into() });
    }

    #[test]
    fn test_decode_page_with_extra_pagination() {
        let body = br#"{"attributes":[{"id":"a"},{"id":"b"}],"pagination":{"total":42,"page":2},"result":"ok"}"#;
        let page = decode::<Vec<Item>>(StatusCode::OK, body)
            .unwrap()
            .into_page()
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total(), 42);
        assert_eq!(page.pagination.unwrap().extra["page"], 2);
    }

    #[test]
    fn test_error_result_is_an_error() {
        let body = br#"{"result":"error","message":"list not found"}"#;
        let err = decode::<Item>(StatusCode::OK, body)
            .unwrap()
            .into_attributes()
            .unwrap_err();
        assert_eq!(err, ClientError::Api("list not found".into()));
    }

    #[test]
    fn test_error_code_is_translated() {
        let body = br#"{"result":"error","error":"AUTH_0004","message":"bad creds"}"#;
        let err = decode::<Item>(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert_eq!(err, ClientError::http(StatusCode::UNAUTHORIZED, "Email or password invalid"));
    }

    #[test]
    fn test_unknown_code_falls_back_to_code() {
        assert_eq!(error_message(Some("LIST_0001"), Some("msg")), "LIST_0001");
        assert_eq!(error_message(None, Some("msg")), "msg");
        assert_eq!(error_message(None, None), "Unknown error");
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = decode::<Item>(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));

        let err = decode::<Item>(StatusCode::OK, br#"{"attributes":{"id":1},"result":"ok"}"#)
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_unit_responses() {
        assert!(decode_unit(StatusCode::NO_CONTENT, b"").is_ok());
        assert!(decode_unit(StatusCode::OK, br#"{"result":"ok"}"#).is_ok());
        assert!(decode_unit(StatusCode::OK, br#"{"result":"error","message":"x"}"#).is_err());
        assert_eq!(
            decode_unit(StatusCode::INTERNAL_SERVER_ERROR, b"boom").unwrap_err().status(),
            Some(500)
        );
    }
}
