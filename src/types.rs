// src/types.rs
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials { pub guid: String, pub pin: String }

/// Session identifier handed out by the backend in the `SID` cookie field.
///
/// Only [`crate::cookie`] extraction produces one, so it is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub(crate) fn new(value: String) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for a `Cookie` request header carrying this session.
    pub fn cookie_header(&self) -> String {
        format!("SID={}", self.0)
    }
}

// keep tokens out of logs
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload(pub Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingPassword(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessKeyRecord {
    pub key: String,
    pub value: String,
    pub pin: String,
}

impl AccessKeyRecord {
    /// Fresh record with random key and value bound to `pin`.
    pub fn generate(pin: &str) -> Self {
        Self {
            key: random_token(),
            value: random_token(),
            pin: pin.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResult {
    /// A missing `success` field counts as failure.
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(false)
    }
}

fn random_token() -> String {
    let mut b = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut b);
    URL_SAFE_NO_PAD.encode(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_without_success_is_falsy() {
        let s: StatusResult = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert_eq!(s.success, None);
        assert!(!s.is_success());
    }

    #[test]
    fn status_accepts_error_alias() {
        let s: StatusResult =
            serde_json::from_str(r#"{"success":false,"error":"Incorrect PIN"}"#).unwrap();
        assert_eq!(s.message.as_deref(), Some("Incorrect PIN"));
        assert!(!s.is_success());
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(SessionToken::new(String::new()).is_none());
        let t = SessionToken::new("abc".into()).unwrap();
        assert_eq!(t.cookie_header(), "SID=abc");
        assert_eq!(format!("{t:?}"), "SessionToken(..)");
    }

    #[test]
    fn generated_records_differ() {
        let a = AccessKeyRecord::generate("1234");
        let b = AccessKeyRecord::generate("1234");
        assert_ne!(a.key, b.key);
        assert_ne!(a.value, b.value);
        assert_eq!(a.key.len(), 22);
        assert_eq!(a.pin, "1234");
    }
}
