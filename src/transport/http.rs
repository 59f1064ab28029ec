use super::{Transport, TransportError};
use crate::types::{Headers, HttpRequest, HttpResponse, Protocol, RequestBody, ResponseBody};
use crate::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Proxy;
use std::env;
use std::time::Duration;

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with env-overridable defaults
    /// (`RESPONSE_CACHE_HTTP_TIMEOUT_SECS`, `RESPONSE_CACHE_PROXY_URL`).
    pub fn new() -> Result<Self> {
        let timeout_secs = env::var("RESPONSE_CACHE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("RESPONSE_CACHE_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build(&self, request: HttpRequest) -> std::result::Result<reqwest::RequestBuilder, TransportError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| TransportError::Other(format!("invalid method {}: {}", request.method, e)))?;
        let mut req = self.client.request(method, &request.url);

        for (name, value) in request.headers.iter() {
            req = req.header(name, value);
        }

        req = match request.body {
            Some(RequestBody::Form(fields)) => req.form(&fields),
            Some(RequestBody::Bytes { content_type, data }) => {
                let req = match content_type {
                    Some(ct) if !request.headers.contains("content-type") => {
                        req.header(reqwest::header::CONTENT_TYPE, ct)
                    }
                    _ => req,
                };
                req.body(data)
            }
            None => req,
        };
        Ok(req)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        let resp = self.build(request)?.send().await?;

        let status = resp.status();
        let headers = Headers::from(resp.headers());
        let content_type = headers.get("content-type").map(str::to_string);
        let content_length = resp.content_length();
        let protocol = Protocol::from(resp.version());

        let stream = resp
            .bytes_stream()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)));

        Ok(HttpResponse::new(
            status.as_u16(),
            ResponseBody::from_stream(content_type, content_length, Box::pin(stream)),
        )
        .with_message(status.canonical_reason().unwrap_or(""))
        .with_protocol(protocol)
        .with_headers(headers)
        .with_url(url))
    }
}
