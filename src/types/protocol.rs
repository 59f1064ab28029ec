//! HTTP protocol versions as recorded in cached entries.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Protocol {
    Http10,
    #[default]
    Http11,
    Spdy3,
    Http2,
    H2PriorKnowledge,
    Quic,
}

impl Protocol {
    /// Enumeration name used in the on-disk `@:protocol` record.
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Http10 => "HTTP_1_0",
            Protocol::Http11 => "HTTP_1_1",
            Protocol::Spdy3 => "SPDY_3",
            Protocol::Http2 => "HTTP_2",
            Protocol::H2PriorKnowledge => "H2_PRIOR_KNOWLEDGE",
            Protocol::Quic => "QUIC",
        }
    }

    /// ALPN-style wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http10 => "HTTP/1.0",
            Protocol::Http11 => "HTTP/1.1",
            Protocol::Spdy3 => "spdy/3.1",
            Protocol::Http2 => "h2",
            Protocol::H2PriorKnowledge => "h2_prior_knowledge",
            Protocol::Quic => "quic",
        }
    }

    /// Lenient parse for stored records: blank or unrecognised values yield HTTP/1.1.
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown protocol: {0}")]
pub struct UnknownProtocol(pub String);

impl FromStr for Protocol {
    type Err = UnknownProtocol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p = match s {
            "HTTP_1_0" | "HTTP/1.0" | "http/1.0" => Protocol::Http10,
            "HTTP_1_1" | "HTTP/1.1" | "http/1.1" => Protocol::Http11,
            "SPDY_3" | "spdy/3.1" => Protocol::Spdy3,
            "HTTP_2" | "HTTP/2" | "HTTP/2.0" | "h2" => Protocol::Http2,
            "H2_PRIOR_KNOWLEDGE" | "h2_prior_knowledge" => Protocol::H2PriorKnowledge,
            "QUIC" | "HTTP/3" | "HTTP/3.0" | "quic" => Protocol::Quic,
            other => return Err(UnknownProtocol(other.to_string())),
        };
        Ok(p)
    }
}

impl From<reqwest::Version> for Protocol {
    fn from(v: reqwest::Version) -> Self {
        match v {
            reqwest::Version::HTTP_09 | reqwest::Version::HTTP_10 => Protocol::Http10,
            reqwest::Version::HTTP_2 => Protocol::Http2,
            reqwest::Version::HTTP_3 => Protocol::Quic,
            _ => Protocol::Http11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_parses_back() {
        for p in [
            Protocol::Http10,
            Protocol::Http11,
            Protocol::Spdy3,
            Protocol::Http2,
            Protocol::H2PriorKnowledge,
            Protocol::Quic,
        ] {
            assert_eq!(p.name().parse::<Protocol>(), Ok(p));
            assert_eq!(p.as_str().parse::<Protocol>(), Ok(p));
        }
    }

    #[test]
    fn test_missing_or_blank_defaults_to_http11() {
        assert_eq!(Protocol::parse_or_default(None), Protocol::Http11);
        assert_eq!(Protocol::parse_or_default(Some("")), Protocol::Http11);
        assert_eq!(Protocol::parse_or_default(Some("  ")), Protocol::Http11);
        assert_eq!(Protocol::parse_or_default(Some("gopher")), Protocol::Http11);
        assert_eq!(Protocol::parse_or_default(Some("HTTP_2")), Protocol::Http2);
        assert_eq!(Protocol::default().to_string(), "HTTP/1.1");
    }
}
