// src/http.rs

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::WalletConfig;
use crate::error::TransportError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base: String,
    api_code: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &WalletConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("wallet-session/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &WalletConfig) -> Self {
        Self {
            client,
            base: config.api_url.trim_end_matches('/').to_string(),
            api_code: config.api_code.clone(),
            timeout: config.timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> RequestBuilder {
        let mut q: Vec<(&str, &str)> = query.iter().copied().collect();
        if let Some(code) = &self.api_code {
            q.push(("api_code", code.as_str()));
        }
        self.client.get(self.url(path)).query(&q)
    }

    fn post_form(&self, path: &str, form: &[(&str, &str)]) -> RequestBuilder {
        let mut f: Vec<(&str, &str)> = form.iter().copied().collect();
        if let Some(code) = &self.api_code {
            f.push(("api_code", code.as_str()));
        }
        self.client.post(self.url(path)).form(&f)
    }

    fn build(&self, request: &ApiRequest) -> RequestBuilder {
        const WALLET_QUERY: [(&str, &str); 2] = [("format", "json"), ("resend_code", "false")];
        match request {
            ApiRequest::SessionId { guid } => self.get(&format!("wallet/{guid}"), &WALLET_QUERY),
            ApiRequest::EncryptedPayload { guid, session } => self
                .get(&format!("wallet/{guid}"), &WALLET_QUERY)
                .header(COOKIE, session.cookie_header()),
            ApiRequest::PairingEncryptionPassword { guid } => self.post_form(
                "wallet",
                &[("method", "pairing-encryption-password"), ("guid", guid.as_str())],
            ),
            ApiRequest::SetAccess { key, value, pin } => self.post_form(
                "pin-store",
                &[
                    ("method", "put"),
                    ("key", key.as_str()),
                    ("value", value.as_str()),
                    ("pin", pin.as_str()),
                ],
            ),
            ApiRequest::ValidateAccess { key, pin } => self.post_form(
                "pin-store",
                &[("method", "get"), ("key", key.as_str()), ("pin", pin.as_str())],
            ),
            ApiRequest::LogEvent { name } => self.get("event", &[("name", name.as_str())]),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: Option<String>,
    code: Option<String>,
}

/// Split a failure body into (code, message), accepting JSON or plain text.
fn parse_error_body(status: u16, body: &[u8]) -> (Option<String>, String) {
    if let Ok(ErrorBody { error, code }) = serde_json::from_slice::<ErrorBody>(body) {
        if error.is_some() || code.is_some() {
            return (code, error.unwrap_or_default());
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        (None, format!("status {status}"))
    } else {
        (None, text)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        debug!(request = request.name(), "wallet backend call");
        let res = self.build(&request).timeout(self.timeout).send().await?;

        let status = res.status();
        let headers = res.headers().clone();
        let body = res.bytes().await?.to_vec();

        if !status.is_success() {
            let (code, message) = parse_error_body(status.as_u16(), &body);
            debug!(request = request.name(), status = status.as_u16(), "backend rejected call");
            return Err(TransportError::Status { status: status.as_u16(), code, message });
        }
        Ok(ApiResponse { status: status.as_u16(), headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionToken;

    #[test]
    fn json_error_body() {
        let (code, msg) = parse_error_body(403, br#"{"error":"Incorrect PIN","code":"incorrect_pin"}"#);
        assert_eq!(code.as_deref(), Some("incorrect_pin"));
        assert_eq!(msg, "Incorrect PIN");
    }

    #[test]
    fn text_error_body() {
        assert_eq!(parse_error_body(500, b"Server unavailable\n"), (None, "Server unavailable".into()));
        assert_eq!(parse_error_body(502, b""), (None, "status 502".into()));
    }

    #[test]
    fn api_code_is_appended() {
        let cfg = WalletConfig {
            api_url: "http://localhost:1/".into(),
            api_code: Some("k".into()),
            ..WalletConfig::default()
        };
        let t = HttpTransport::with_client(Client::new(), &cfg);
        let req = t
            .build(&ApiRequest::LogEvent { name: "wallet_open".into() })
            .build()
            .unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:1/event?name=wallet_open&api_code=k");

        let req = t
            .build(&ApiRequest::EncryptedPayload {
                guid: "g".into(),
                session: SessionToken::new("s".into()).unwrap(),
            })
            .build()
            .unwrap();
        assert_eq!(req.headers()[COOKIE], "SID=s");
        assert_eq!(req.url().path(), "/wallet/g");
    }

    #[test]
    fn api_code_is_appended_to_forms() {
        let cfg = WalletConfig { api_code: Some("k".into()), ..WalletConfig::default() };
        let t = HttpTransport::with_client(Client::new(), &cfg);
        let req = t
            .build(&ApiRequest::ValidateAccess { key: "pk".into(), pin: "1234".into() })
            .build()
            .unwrap();
        assert_eq!(req.method(), &reqwest::Method::POST);
        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, b"method=get&key=pk&pin=1234&api_code=k");
    }
}
