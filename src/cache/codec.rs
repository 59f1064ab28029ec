//! Flat-string header encoding.
//!
//! The format has no escaping: a header value containing either separator
//! will not decode back to itself. Existing cache directories depend on these
//! exact tokens, so they must not change without versioning the format.

use crate::types::Headers;

/// Between successive headers.
pub const ENTRY_SEPARATOR: &str = "@:header:@";
/// Between one header's name and value.
pub const PAIR_SEPARATOR: &str = "@:header:=@";

pub fn encode_headers(headers: &Headers) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}{}{}", name, PAIR_SEPARATOR, value))
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

/// Pieces that do not split into exactly two non-empty parts are dropped.
pub fn decode_headers(encoded: Option<&str>) -> Headers {
    let encoded = match encoded {
        Some(s) if !s.is_empty() => s,
        _ => return Headers::new(),
    };
    encoded
        .split(ENTRY_SEPARATOR)
        .filter_map(|piece| {
            let mut parts = piece.split(PAIR_SEPARATOR);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(value), None) if !name.is_empty() && !value.is_empty() => {
                    Some((name, value))
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let headers: Headers = [("Content-Type", "text/plain"), ("X-Id", "7")]
            .into_iter()
            .collect();
        assert_eq!(
            encode_headers(&headers),
            "Content-Type@:header:=@text/plain@:header:@X-Id@:header:=@7"
        );
        assert_eq!(encode_headers(&Headers::new()), "");
    }

    #[test]
    fn test_roundtrip_preserves_order_and_duplicates() {
        let headers: Headers = [
            ("Set-Cookie", "a=1; Path=/"),
            ("Content-Type", "application/json; charset=utf-8"),
            ("Set-Cookie", "b=2"),
            ("Date", "Thu, 01 Jan 2026 00:00:00 GMT"),
        ]
        .into_iter()
        .collect();
        assert_eq!(decode_headers(Some(&encode_headers(&headers))), headers);
    }

    #[test]
    fn test_empty_or_missing_decodes_to_nothing() {
        assert!(decode_headers(None).is_empty());
        assert!(decode_headers(Some("")).is_empty());
    }

    #[test]
    fn test_malformed_pieces_are_skipped() {
        let encoded = [
            "A@:header:=@1",
            "no-separator",
            "@:header:=@missing-name",
            "missing-value@:header:=@",
            "x@:header:=@y@:header:=@z",
            "B@:header:=@2",
        ]
        .join(ENTRY_SEPARATOR);
        let pairs: Vec<_> = decode_headers(Some(&encoded))
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![("A".to_string(), "1".to_string()), ("B".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_value_containing_separator_is_truncated() {
        let headers: Headers = [("X-Odd", "left@:header:@right"), ("Ok", "1")]
            .into_iter()
            .collect();
        let decoded = decode_headers(Some(&encode_headers(&headers)));
        assert_eq!(decoded.get("X-Odd"), Some("left"));
        assert_eq!(decoded.get("Ok"), Some("1"));
        assert_eq!(decoded.len(), 2);
    }
}
