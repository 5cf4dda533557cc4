// src/error.rs
//
// `TransportError` is whatever the transport reports. `WalletError` is what
// callers of `WalletService` branch on; only session negotiation and PIN
// validation add variants of their own.

/// Backend error code for a rejected PIN.
pub const INCORRECT_PIN_CODE: &str = "incorrect_pin";

/// Message fragment the backend uses for a rejected PIN.
pub const INCORRECT_PIN_MESSAGE: &str = "Incorrect PIN";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or timeout failure.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl TransportError {
    /// True when the failure denotes a wrong PIN, by structured code or,
    /// for backends that only send text, by message.
    pub fn is_incorrect_pin(&self) -> bool {
        match self {
            TransportError::Status { code: Some(code), .. } if code == INCORRECT_PIN_CODE => true,
            other => other.to_string().contains(INCORRECT_PIN_MESSAGE),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Decode(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// No `Set-Cookie` header on the session response.
    #[error("Session ID not found in headers")]
    SessionNotFound,

    /// `Set-Cookie` present but without a usable `SID` field.
    #[error("Session ID field missing from Set-Cookie header")]
    SessionFieldMissing,

    #[error("Incorrect PIN")]
    InvalidCredentials,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl WalletError {
    /// Server-reported failures raised by this crate rather than the transport.
    pub fn is_api_error(&self) -> bool {
        matches!(self, WalletError::SessionNotFound | WalletError::SessionFieldMissing)
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: Option<&str>, message: &str) -> TransportError {
        TransportError::Status {
            status: 403,
            code: code.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn structured_code_is_recognised() {
        assert!(status(Some("incorrect_pin"), "forbidden").is_incorrect_pin());
    }

    #[test]
    fn message_fallback_matches_substring() {
        assert!(status(None, "Incorrect PIN").is_incorrect_pin());
        assert!(status(None, "Incorrect PIN. 2 attempts left").is_incorrect_pin());
        assert!(TransportError::Network("Incorrect PIN".into()).is_incorrect_pin());
    }

    #[test]
    fn other_failures_are_not_pin_failures() {
        assert!(!status(None, "Server unavailable").is_incorrect_pin());
        assert!(!status(Some("rate_limited"), "slow down").is_incorrect_pin());
        assert!(!TransportError::Decode("eof".into()).is_incorrect_pin());
    }

    #[test]
    fn api_error_class() {
        assert!(WalletError::SessionNotFound.is_api_error());
        assert!(WalletError::SessionFieldMissing.is_api_error());
        assert!(!WalletError::InvalidCredentials.is_api_error());
    }
}
