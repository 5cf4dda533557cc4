// src/transport.rs

use async_trait::async_trait;
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::de::DeserializeOwned;

use crate::error::TransportError;
use crate::types::SessionToken;

/// One backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    SessionId { guid: String },
    EncryptedPayload { guid: String, session: SessionToken },
    PairingEncryptionPassword { guid: String },
    SetAccess { key: String, value: String, pin: String },
    ValidateAccess { key: String, pin: String },
    LogEvent { name: String },
}

impl ApiRequest {
    /// Short label for logs; never includes secrets.
    pub fn name(&self) -> &'static str {
        match self {
            ApiRequest::SessionId { .. } => "session-id",
            ApiRequest::EncryptedPayload { .. } => "encrypted-payload",
            ApiRequest::PairingEncryptionPassword { .. } => "pairing-encryption-password",
            ApiRequest::SetAccess { .. } => "set-access",
            ApiRequest::ValidateAccess { .. } => "validate-access",
            ApiRequest::LogEvent { .. } => "log-event",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: HeaderMap::new(), body: body.into() }
    }

    pub fn has_set_cookie(&self) -> bool {
        self.headers.contains_key(SET_COOKIE)
    }

    /// Every `Set-Cookie` value in order; bytes outside UTF-8 are replaced,
    /// never dropped.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> Result<String, TransportError> {
        String::from_utf8(self.body.clone()).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Issues backend calls. Implementations report non-success statuses as
/// [`TransportError::Status`], never as an `Ok` response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).execute(request).await
    }
}
