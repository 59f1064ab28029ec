//! Per-request opt-in check.

use crate::types::HttpRequest;

/// Flag header that opts a request into caching when set to exactly `true`.
pub const CACHE_HEADER: &str = "cache";
pub const CACHE_CONTROL_HEADER: &str = "Cache-Control";

/// Caching engages for `cache: true` or any non-empty `Cache-Control`.
pub fn should_cache(request: &HttpRequest) -> bool {
    request.header(CACHE_HEADER) == Some("true")
        || request
            .header(CACHE_CONTROL_HEADER)
            .is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_flag_must_be_exactly_true() {
        assert!(should_cache(&HttpRequest::get("http://x").with_header("cache", "true")));
        assert!(should_cache(&HttpRequest::get("http://x").with_header("Cache", "true")));
        assert!(!should_cache(&HttpRequest::get("http://x").with_header("cache", "TRUE")));
        assert!(!should_cache(&HttpRequest::get("http://x").with_header("cache", "1")));
        assert!(!should_cache(&HttpRequest::get("http://x").with_header("cache", "false")));
    }

    #[test]
    fn test_any_non_empty_cache_control_engages() {
        assert!(should_cache(
            &HttpRequest::get("http://x").with_header("Cache-Control", "no-cache")
        ));
        assert!(should_cache(
            &HttpRequest::get("http://x").with_header("cache-control", "max-age=0")
        ));
        assert!(!should_cache(&HttpRequest::get("http://x").with_header("Cache-Control", "")));
    }

    #[test]
    fn test_plain_request_bypasses() {
        assert!(!should_cache(&HttpRequest::get("http://x")));
        assert!(!should_cache(
            &HttpRequest::get("http://x").with_header("Pragma", "no-cache")
        ));
    }
}
