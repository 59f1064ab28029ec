//! Network transports.
//!
//! A [`Transport`] issues exactly one network call per request. It reports
//! non-2xx statuses as ordinary responses; only calls that could not complete
//! (connection, TLS, timeout, cancellation) become a [`TransportError`].

mod http;

pub use http::ReqwestTransport;

use crate::types::{HttpRequest, HttpResponse};
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
