//! 响应缓存模块：磁盘键值存储、请求指纹与头部编码。
//!
//! # Response Caching Module
//!
//! Storage side of the offline-first cache: a flat key-value store, the
//! request fingerprint that indexes it, and the structured entry layered on top.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`KeyValueStore`] | Trait for flat string-keyed persistence |
//! | [`DiskStore`] | One file per key in a cache directory |
//! | [`MemoryStore`] | In-process store for tests |
//! | [`CacheKey`] | Request fingerprint (`url?a=1,b=2`) |
//! | [`EntryStore`] | Five-record entries: body, media type, protocol, message, headers |
//! | [`CacheConfig`] | Cache directory, fallback sentinel and failure policy |
//! | [`should_cache`] | Per-request opt-in check |
//!
//! ## Example
//!
//! ```rust
//! use response_cache::cache::{CacheKey, should_cache};
//! use response_cache::types::HttpRequest;
//!
//! let req = HttpRequest::get("http://x/a").cached();
//! assert!(should_cache(&req));
//! assert_eq!(CacheKey::from_request(&req).as_str(), "http://x/a?");
//! ```

mod backend;
pub mod codec;
mod config;
mod entry;
mod gate;
mod key;

pub use backend::{DiskStore, KeyValueStore, MemoryStore, StoreError, StoredStream};
pub use codec::{decode_headers, encode_headers};
pub use config::{
    default_cache_dir, CacheConfig, StoreFailurePolicy, DEFAULT_CACHE_DIR_NAME,
    DEFAULT_FALLBACK_MESSAGE,
};
pub use entry::{CacheEntry, EntryStore, StoredEntry, STORED_STATUS};
pub use gate::{should_cache, CACHE_CONTROL_HEADER, CACHE_HEADER};
pub use key::{CacheKey, SubKey};
