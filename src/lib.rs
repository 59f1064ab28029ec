//! # response-cache
//!
//! 离线优先的 HTTP 响应缓存拦截器。
//!
//! Offline-first HTTP response cache that sits in a client's interceptor chain.
//!
//! ## Overview
//!
//! Requests opt in per call, either with a `cache: true` header or with any
//! non-empty `Cache-Control` header. For those requests the network is always
//! tried first:
//!
//! - a 2xx response is written to a disk-backed key-value store and served
//!   back from that store;
//! - a failed network call is answered from the store when an entry exists,
//!   with the response message set to a fallback sentinel (`DISK_CACHE` by
//!   default) so callers can tell it apart from a live answer;
//! - everything else passes through untouched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use response_cache::cache::CacheConfig;
//! use response_cache::interceptors::{CacheInterceptor, InterceptorPipeline};
//! use response_cache::transport::ReqwestTransport;
//! use response_cache::types::HttpRequest;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> response_cache::Result<()> {
//!     let pipeline = InterceptorPipeline::new(Arc::new(ReqwestTransport::new()?))
//!         .with(CacheInterceptor::new(CacheConfig::default()));
//!
//!     let resp = pipeline
//!         .execute(HttpRequest::get("https://example.com/feed").cached())
//!         .await?;
//!     println!("{} {}", resp.status, resp.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Request, response, header and protocol model |
//! | [`cache`] | Key-value stores, fingerprinting, header codec, configuration |
//! | [`interceptors`] | Interceptor chain and the caching interceptor |
//! | [`transport`] | Network transports (reqwest) |

pub mod cache;
pub mod interceptors;
pub mod transport;
pub mod types;

pub use cache::{CacheConfig, CacheKey, DiskStore, KeyValueStore, MemoryStore};
pub use interceptors::{CacheInterceptor, Interceptor, InterceptorPipeline, Next};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{Headers, HttpRequest, HttpResponse, Protocol, RequestBody, ResponseBody};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream of fallible chunks.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
