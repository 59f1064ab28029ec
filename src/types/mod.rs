//! 类型系统模块：定义请求、响应与协议的核心数据类型。
//!
//! # Types Module
//!
//! Transport-neutral request/response model shared by interceptors, the cache
//! and transports.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HttpRequest`] | Outgoing request: method, URL, ordered headers, optional body |
//! | [`RequestBody`] | Form-encoded fields or raw bytes |
//! | [`HttpResponse`] | Status, message, protocol, headers and a streaming body |
//! | [`ResponseBody`] | Owned byte stream with optional media type and length |
//! | [`Headers`] | Ordered header collection with case-insensitive lookup |
//! | [`Protocol`] | HTTP protocol version enumeration |
//!
//! ## Example
//!
//! ```rust
//! use response_cache::types::{HttpRequest, Headers};
//!
//! let req = HttpRequest::post("http://x/b")
//!     .with_header("Cache-Control", "max-age=0")
//!     .with_form([("a", "1"), ("b", "2")]);
//! assert_eq!(req.header("cache-control"), Some("max-age=0"));
//! assert_eq!(Headers::new().len(), 0);
//! ```

pub mod headers;
pub mod protocol;
pub mod request;
pub mod response;

pub use headers::Headers;
pub use protocol::Protocol;
pub use request::{HttpRequest, RequestBody};
pub use response::{HttpResponse, ResponseBody};
