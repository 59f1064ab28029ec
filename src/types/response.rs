//! Response model with an owned, streaming body.

use super::headers::Headers;
use super::protocol::Protocol;
use crate::{BoxStream, Error, Result};
use bytes::{Bytes, BytesMut};
use futures::{stream, StreamExt, TryStreamExt};
use std::fmt;

/// Response payload.
///
/// The underlying stream owns whatever resource produces the bytes (a network
/// connection or an open cache file); dropping the body releases it.
pub struct ResponseBody {
    content_type: Option<String>,
    content_length: Option<u64>,
    stream: BoxStream<'static, Bytes>,
}

impl ResponseBody {
    pub fn from_stream(
        content_type: Option<String>,
        content_length: Option<u64>,
        stream: BoxStream<'static, Bytes>,
    ) -> Self {
        Self {
            content_type,
            content_length,
            stream,
        }
    }

    pub fn from_bytes(content_type: Option<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let len = data.len() as u64;
        Self::from_stream(
            content_type,
            Some(len),
            Box::pin(stream::once(async move { Ok::<_, Error>(data) })),
        )
    }

    pub fn empty() -> Self {
        Self::from_bytes(None, Bytes::new())
    }

    /// Media type of the payload, e.g. `application/json`.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Drain the stream into memory.
    pub async fn bytes(self) -> Result<Bytes> {
        let capacity = self.content_length.unwrap_or(0) as usize;
        let buf = self
            .stream
            .try_fold(BytesMut::with_capacity(capacity), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok(buf)
            })
            .await?;
        Ok(buf.freeze())
    }

    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Pull the next chunk without buffering the rest.
    pub async fn next_chunk(&mut self) -> Option<Result<Bytes>> {
        self.stream.next().await
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase, or the fallback sentinel when served from disk after a network failure.
    pub message: String,
    pub protocol: Protocol,
    pub headers: Headers,
    pub body: ResponseBody,
    /// URL of the request this response answers, when known.
    pub url: Option<String>,
}

impl HttpResponse {
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self {
            status,
            message: String::new(),
            protocol: Protocol::default(),
            headers: Headers::new(),
            body,
            url: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.body.content_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_body_collects_all_chunks() {
        let chunks: Vec<Result<Bytes>> = vec![Ok(Bytes::from("he")), Ok(Bytes::from("llo"))];
        let body = ResponseBody::from_stream(None, None, Box::pin(stream::iter(chunks)));
        assert_eq!(body.text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_next_chunk_yields_in_order_then_ends() {
        let chunks: Vec<Result<Bytes>> = vec![Ok(Bytes::from("a")), Ok(Bytes::from("b"))];
        let mut body = ResponseBody::from_stream(None, None, Box::pin(stream::iter(chunks)));
        assert_eq!(body.next_chunk().await.unwrap().unwrap(), Bytes::from("a"));
        assert_eq!(body.next_chunk().await.unwrap().unwrap(), Bytes::from("b"));
        assert!(body.next_chunk().await.is_none());
    }

    #[tokio::test]
    async fn test_from_bytes_knows_length() {
        let body = ResponseBody::from_bytes(Some("text/plain".into()), "hi");
        assert_eq!(body.content_length(), Some(2));
        assert_eq!(body.content_type(), Some("text/plain"));
        assert_eq!(body.bytes().await.unwrap(), Bytes::from("hi"));
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, ResponseBody::empty()).is_success());
        assert!(HttpResponse::new(204, ResponseBody::empty()).is_success());
        assert!(!HttpResponse::new(304, ResponseBody::empty()).is_success());
        assert!(!HttpResponse::new(500, ResponseBody::empty()).is_success());
    }
}
