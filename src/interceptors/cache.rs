//! 缓存拦截器：网络优先，失败时回退到磁盘缓存。
//!
//! Offline-first caching interceptor.
//!
//! Per request:
//! - no `cache: true` flag and no `Cache-Control` header: pass straight through;
//! - network call fails: serve the stored entry with the fallback sentinel as
//!   its message, or surface the transport error when nothing is stored;
//! - 2xx response: store it, then serve the entry as re-read from the store;
//! - any other status: return it untouched.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::{Interceptor, Next};
use crate::cache::{
    should_cache, CacheConfig, CacheEntry, CacheKey, DiskStore, EntryStore, KeyValueStore,
    StoreError, StoreFailurePolicy, STORED_STATUS,
};
use crate::types::{HttpRequest, HttpResponse, ResponseBody};
use crate::{Error, Result};

const LOCK_STRIPES: usize = 64;

/// Striped per-key locks; keys sharing a stripe also serialize.
struct KeyLocks {
    stripes: Vec<Mutex<()>>,
}

impl KeyLocks {
    fn new() -> Self {
        Self {
            stripes: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    async fn lock(&self, key: &CacheKey) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let idx = (hasher.finish() as usize) % self.stripes.len();
        self.stripes[idx].lock().await
    }
}

pub struct CacheInterceptor {
    entries: EntryStore,
    config: CacheConfig,
    locks: Option<KeyLocks>,
}

impl CacheInterceptor {
    /// Disk-backed interceptor rooted at `config.cache_dir`.
    pub fn new(config: CacheConfig) -> Self {
        let store = Arc::new(DiskStore::new(config.cache_dir.clone()));
        Self::with_store(store, config)
    }

    /// Use any key-value store; `config.cache_dir` is ignored.
    pub fn with_store(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
        let locks = config.lock_writes.then(KeyLocks::new);
        Self {
            entries: EntryStore::new(store),
            config,
            locks,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(CacheConfig::from_env()?))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    async fn lock(&self, key: &CacheKey) -> Option<MutexGuard<'_, ()>> {
        match &self.locks {
            Some(locks) => Some(locks.lock(key).await),
            None => None,
        }
    }

    /// Persist a successful response and answer with the copy read back from the store.
    ///
    /// The body is drained into memory before any record is written, so the
    /// body record only ever holds a complete payload.
    async fn store_and_serve(
        &self,
        key: &CacheKey,
        url: &str,
        response: HttpResponse,
    ) -> Result<HttpResponse> {
        let HttpResponse {
            status,
            message,
            protocol,
            headers,
            body,
            ..
        } = response;
        let media_type = body.content_type().map(str::to_string);
        let entry = CacheEntry {
            body: body.bytes().await?,
            media_type,
            protocol,
            message,
            headers,
        };

        let _guard = self.lock(key).await;
        if let Err(err) = self.entries.store(key, &entry).await {
            return self.on_store_failure(key, err, status, entry, url);
        }

        let response = match self.entries.load(key).await {
            Ok(Some(stored)) => stored.into_response(None),
            Ok(None) => {
                warn!(cache_key = %key, "entry vanished right after storing; serving live copy");
                live_response(STORED_STATUS, entry)
            }
            Err(err) => return self.on_store_failure(key, err, status, entry, url),
        };
        debug!(cache_key = %key, "served freshly stored response");
        Ok(response.with_url(url))
    }

    fn on_store_failure(
        &self,
        key: &CacheKey,
        err: StoreError,
        status: u16,
        entry: CacheEntry,
        url: &str,
    ) -> Result<HttpResponse> {
        match self.config.store_failure {
            StoreFailurePolicy::Fail => {
                warn!(cache_key = %key, error = %err, "cache store failed");
                Err(Error::Store(err))
            }
            StoreFailurePolicy::ServeLive => {
                warn!(cache_key = %key, error = %err, "cache store failed; serving live response uncached");
                Ok(live_response(status, entry).with_url(url))
            }
        }
    }

    /// Stand in for a failed network call with the stored entry, if any.
    async fn serve_fallback(&self, key: &CacheKey, cause: Error) -> Result<HttpResponse> {
        let _guard = self.lock(key).await;
        match self.entries.load(key).await {
            Ok(Some(stored)) => {
                info!(
                    cache_key = %key,
                    backend = self.entries.backend_name(),
                    error = %cause,
                    "network failed; serving cached response"
                );
                Ok(stored.into_response(Some(&self.config.fallback_message)))
            }
            Ok(None) => {
                debug!(cache_key = %key, "network failed and nothing cached");
                Err(cause)
            }
            Err(err) => {
                warn!(cache_key = %key, error = %err, "cache lookup failed during fallback");
                Err(cause)
            }
        }
    }
}

fn live_response(status: u16, entry: CacheEntry) -> HttpResponse {
    HttpResponse::new(status, ResponseBody::from_bytes(entry.media_type, entry.body))
        .with_message(entry.message)
        .with_protocol(entry.protocol)
        .with_headers(entry.headers)
}

#[async_trait]
impl Interceptor for CacheInterceptor {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        if !should_cache(&request) {
            return next.run(request).await;
        }

        let key = CacheKey::from_request(&request);
        let url = request.url.clone();
        let outcome = match next.run(request).await {
            Ok(response) if response.is_success() => {
                self.store_and_serve(&key, &url, response).await
            }
            Ok(response) => {
                debug!(cache_key = %key, status = response.status, "not caching unsuccessful response");
                return Ok(response);
            }
            Err(err) => Err(err),
        };

        // A body that breaks off mid-read is a transport failure as well.
        match outcome {
            Err(err) if err.is_transport() => self
                .serve_fallback(&key, err)
                .await
                .map(|response| response.with_url(url)),
            other => other,
        }
    }

    fn name(&self) -> &str {
        "cache"
    }
}
