//! Cache key derivation.

use crate::types::{HttpRequest, RequestBody};
use url::form_urlencoded::byte_serialize;
use url::Url;

/// Index of a cache entry: the request URL, `?`, then the encoded form fields of a POST.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive the key for a request. Pure; equal requests always map to equal keys.
    ///
    /// The URL is taken in its canonical form, so `HTTP://X` and `http://x/`
    /// share a key. Non-form POST bodies do not contribute, so two different
    /// JSON bodies posted to the same URL share one key.
    pub fn from_request(request: &HttpRequest) -> Self {
        Self(format!(
            "{}?{}",
            canonical_url(&request.url),
            post_params(request)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespaced key of a subsidiary record.
    pub fn sub_key(&self, record: SubKey) -> String {
        format!("{}{}", self.0, record.suffix())
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&HttpRequest> for CacheKey {
    fn from(request: &HttpRequest) -> Self {
        Self::from_request(request)
    }
}

/// Records stored beside the primary body record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubKey {
    MediaType,
    Protocol,
    Message,
    Headers,
}

impl SubKey {
    pub const ALL: [SubKey; 4] = [
        SubKey::MediaType,
        SubKey::Protocol,
        SubKey::Message,
        SubKey::Headers,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            SubKey::MediaType => "@:mediaType",
            SubKey::Protocol => "@:protocol",
            SubKey::Message => "@:message",
            SubKey::Headers => "@:headers",
        }
    }
}

/// Serialized form of the parsed URL; unparseable input is used verbatim.
fn canonical_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => url.into(),
        Err(_) => raw.to_string(),
    }
}

/// `name=value` pairs of a form POST, comma-joined and URL-encoded; empty otherwise.
fn post_params(request: &HttpRequest) -> String {
    if request.method != "POST" {
        return String::new();
    }
    match request.body.as_ref().and_then(RequestBody::form_fields) {
        Some(fields) => fields
            .iter()
            .map(|(name, value)| format!("{}={}", encode(name), encode(value)))
            .collect::<Vec<_>>()
            .join(","),
        None => String::new(),
    }
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_key_is_url_and_question_mark() {
        let req = HttpRequest::get("http://x/a").cached();
        assert_eq!(CacheKey::from_request(&req).as_str(), "http://x/a?");
    }

    #[test]
    fn test_equivalent_urls_share_a_key() {
        let key = |url: &str| CacheKey::from_request(&HttpRequest::get(url));
        assert_eq!(key("http://x"), key("http://x/"));
        assert_eq!(key("http://x").as_str(), "http://x/?");
        assert_eq!(key("HTTP://X/a"), key("http://x/a"));
        assert_eq!(key("http://x:80/a"), key("http://x/a"));
        assert_ne!(key("http://x/a"), key("http://x/A"));
    }

    #[test]
    fn test_unparseable_url_is_kept_verbatim() {
        let req = HttpRequest::get("not a url");
        assert_eq!(CacheKey::from_request(&req).as_str(), "not a url?");
    }

    #[test]
    fn test_post_form_fields_keep_order() {
        let req = HttpRequest::post("http://x/b")
            .with_header("Cache-Control", "max-age=0")
            .with_form([("a", "1"), ("b", "2")]);
        assert_eq!(CacheKey::from_request(&req).as_str(), "http://x/b?a=1,b=2");

        let swapped = HttpRequest::post("http://x/b").with_form([("b", "2"), ("a", "1")]);
        assert_eq!(CacheKey::from_request(&swapped).as_str(), "http://x/b?b=2,a=1");
    }

    #[test]
    fn test_post_without_form_has_empty_params() {
        let empty = HttpRequest::post("http://x/b");
        assert_eq!(CacheKey::from_request(&empty).as_str(), "http://x/b?");

        let json = HttpRequest::post("http://x/b").with_bytes(Some("application/json"), "{\"a\":1}");
        let other = HttpRequest::post("http://x/b").with_bytes(Some("application/json"), "{\"a\":2}");
        assert_eq!(CacheKey::from_request(&json).as_str(), "http://x/b?");
        assert_eq!(CacheKey::from_request(&json), CacheKey::from_request(&other));
    }

    #[test]
    fn test_form_on_non_post_is_ignored() {
        let req = HttpRequest::new("PUT", "http://x/c").with_form([("a", "1")]);
        assert_eq!(CacheKey::from_request(&req).as_str(), "http://x/c?");
    }

    #[test]
    fn test_form_fields_are_url_encoded() {
        let req = HttpRequest::post("http://x/d").with_form([("q", "a b&c"), ("é", "=")]);
        assert_eq!(
            CacheKey::from_request(&req).as_str(),
            "http://x/d?q=a+b%26c,%C3%A9=%3D"
        );
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let req = HttpRequest::post("http://x/e").with_form([("k", "v")]);
        assert_eq!(CacheKey::from(&req), CacheKey::from(&req.clone()));
    }

    #[test]
    fn test_sub_keys() {
        let key = CacheKey::new("http://x/a?");
        assert_eq!(key.sub_key(SubKey::MediaType), "http://x/a?@:mediaType");
        assert_eq!(key.sub_key(SubKey::Protocol), "http://x/a?@:protocol");
        assert_eq!(key.sub_key(SubKey::Message), "http://x/a?@:message");
        assert_eq!(key.sub_key(SubKey::Headers), "http://x/a?@:headers");
    }
}
