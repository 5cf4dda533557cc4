// src/lib.rs
//
// Client-side session and PIN access for a wallet custody backend.
// `WalletService` wraps a `Transport` and exposes the six backend calls;
// `HttpTransport` is the reqwest implementation.

pub mod config;
pub mod cookie;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use config::WalletConfig;
pub use error::{Result, TransportError, WalletError};
pub use http::HttpTransport;
pub use service::WalletService;
pub use transport::{ApiRequest, ApiResponse, Transport};
pub use types::*;
