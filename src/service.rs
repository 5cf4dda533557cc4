// src/service.rs

use tracing::{debug, info, warn};

use crate::cookie;
use crate::error::{Result, TransportError, WalletError};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::types::{AccessKeyRecord, EncryptedPayload, PairingPassword, SessionToken, StatusResult};

/// Session negotiation, PIN access and the pass-through wallet calls.
///
/// Holds no state besides the transport; every call is one backend request
/// and calls may run concurrently. Retrying is left to the caller.
#[derive(Clone)]
pub struct WalletService<T> {
    transport: T,
}

impl<T: Transport> WalletService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch the encrypted wallet payload. Needs a token from
    /// [`get_session_id`](Self::get_session_id) for the same GUID.
    pub async fn get_encrypted_payload(&self, guid: &str, session: &SessionToken) -> Result<EncryptedPayload> {
        let res = self
            .call(ApiRequest::EncryptedPayload {
                guid: guid.to_string(),
                session: session.clone(),
            })
            .await?;
        Ok(EncryptedPayload(res.body))
    }

    /// Ask the backend for a session and read `SID` out of `Set-Cookie`.
    ///
    /// A response without `Set-Cookie` is [`WalletError::SessionNotFound`];
    /// one whose cookies carry no non-empty `SID` is
    /// [`WalletError::SessionFieldMissing`].
    pub async fn get_session_id(&self, guid: &str) -> Result<SessionToken> {
        if guid.is_empty() {
            return Err(WalletError::InvalidArgument("guid must not be empty"));
        }
        let res = self.call(ApiRequest::SessionId { guid: guid.to_string() }).await?;
        let token = extract_session(&res)?;
        info!(guid, "session negotiated");
        Ok(token)
    }

    pub async fn get_pairing_encryption_password(&self, guid: &str) -> Result<PairingPassword> {
        let res = self
            .call(ApiRequest::PairingEncryptionPassword { guid: guid.to_string() })
            .await?;
        Ok(PairingPassword(res.text()?))
    }

    /// Register `key`/`value` under `pin`.
    pub async fn set_access_key(&self, key: &str, value: &str, pin: &str) -> Result<StatusResult> {
        let res = self
            .call(ApiRequest::SetAccess {
                key: key.to_string(),
                value: value.to_string(),
                pin: pin.to_string(),
            })
            .await?;
        status_result(&res)
    }

    pub async fn set_access_record(&self, record: &AccessKeyRecord) -> Result<StatusResult> {
        self.set_access_key(&record.key, &record.value, &record.pin).await
    }

    /// Check `pin` against the access key registered as `key`.
    ///
    /// A wrong PIN comes back as [`WalletError::InvalidCredentials`]; every
    /// other failure is returned untouched.
    pub async fn validate_access(&self, key: &str, pin: &str) -> Result<StatusResult> {
        let req = ApiRequest::ValidateAccess { key: key.to_string(), pin: pin.to_string() };
        match self.transport.execute(req).await {
            Ok(res) => status_result(&res),
            Err(e) => Err(classify_validation_failure(e)),
        }
    }

    pub async fn log_event(&self, name: &str) -> Result<StatusResult> {
        let res = self.call(ApiRequest::LogEvent { name: name.to_string() }).await?;
        status_result(&res)
    }

    /// [`log_event`](Self::log_event) for callers that must not be held up
    /// by telemetry.
    pub async fn log_event_best_effort(&self, name: &str) {
        if let Err(e) = self.log_event(name).await {
            warn!(event = name, "event logging failed: {e}");
        }
    }

    async fn call(&self, request: ApiRequest) -> Result<ApiResponse> {
        debug!(request = request.name(), "issuing");
        Ok(self.transport.execute(request).await?)
    }
}

fn extract_session(res: &ApiResponse) -> Result<SessionToken> {
    if !res.has_set_cookie() {
        return Err(WalletError::SessionNotFound);
    }
    let cookies = res.set_cookies();
    cookie::session_id(cookies.iter().map(String::as_str))
        .and_then(SessionToken::new)
        .ok_or(WalletError::SessionFieldMissing)
}

fn classify_validation_failure(e: TransportError) -> WalletError {
    if e.is_incorrect_pin() {
        warn!("PIN rejected by backend");
        WalletError::InvalidCredentials
    } else {
        WalletError::Transport(e)
    }
}

fn status_result(res: &ApiResponse) -> Result<StatusResult> {
    if res.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StatusResult::default());
    }
    Ok(res.json()?)
}
