//! Outgoing request model.

use super::headers::Headers;
use bytes::Bytes;

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` fields in their original order (unencoded).
    Form(Vec<(String, String)>),
    /// Any other payload.
    Bytes {
        content_type: Option<String>,
        data: Bytes,
    },
}

impl RequestBody {
    pub fn form_fields(&self) -> Option<&[(String, String)]> {
        match self {
            RequestBody::Form(fields) => Some(fields),
            RequestBody::Bytes { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Opt this request into caching via the `cache: true` flag header.
    pub fn cached(self) -> Self {
        self.with_header("cache", "true")
    }

    pub fn with_form<I, N, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        self.body = Some(RequestBody::Form(
            fields
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        ));
        self
    }

    pub fn with_bytes(mut self, content_type: Option<&str>, data: impl Into<Bytes>) -> Self {
        self.body = Some(RequestBody::Bytes {
            content_type: content_type.map(str::to_string),
            data: data.into(),
        });
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}
