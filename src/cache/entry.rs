//! Structured entries over the flat key-value store.
//!
//! An entry for key `K` is spread over five records: `K` (body bytes),
//! `K@:mediaType`, `K@:protocol`, `K@:message` and `K@:headers`. The records
//! are written one by one, so concurrent writers of the same key may leave a
//! mix of both responses until the last write lands.

use super::backend::{KeyValueStore, StoreError};
use super::codec::{decode_headers, encode_headers};
use super::key::{CacheKey, SubKey};
use crate::types::{Headers, HttpResponse, Protocol, ResponseBody};
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

/// A successful response captured for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub body: Bytes,
    pub media_type: Option<String>,
    pub protocol: Protocol,
    pub message: String,
    pub headers: Headers,
}

/// An entry read back from the store, its body still streaming from storage.
#[derive(Debug)]
pub struct StoredEntry {
    pub body: ResponseBody,
    pub protocol: Protocol,
    pub message: String,
    pub headers: Headers,
}

/// Only successful responses are stored, so reconstructed responses are always 200.
pub const STORED_STATUS: u16 = 200;

impl StoredEntry {
    /// Rebuild a response; `message` overrides the stored reason phrase when given.
    pub fn into_response(self, message: Option<&str>) -> HttpResponse {
        let message = message.map(str::to_string).unwrap_or(self.message);
        HttpResponse::new(STORED_STATUS, self.body)
            .with_message(message)
            .with_protocol(self.protocol)
            .with_headers(self.headers)
    }
}

#[derive(Clone)]
pub struct EntryStore {
    store: Arc<dyn KeyValueStore>,
}

impl EntryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }

    /// Subsidiary records go first so that the body record's presence implies theirs.
    pub async fn store(&self, key: &CacheKey, entry: &CacheEntry) -> Result<(), StoreError> {
        self.store
            .put_string(&key.sub_key(SubKey::Headers), &encode_headers(&entry.headers))
            .await?;
        self.store
            .put_string(
                &key.sub_key(SubKey::MediaType),
                entry.media_type.as_deref().unwrap_or(""),
            )
            .await?;
        self.store
            .put_string(&key.sub_key(SubKey::Protocol), entry.protocol.name())
            .await?;
        self.store
            .put_string(&key.sub_key(SubKey::Message), &entry.message)
            .await?;
        self.store.put_bytes(key.as_str(), entry.body.clone()).await?;
        debug!(cache_key = %key, backend = self.backend_name(), "stored cache entry");
        Ok(())
    }

    /// Missing subsidiary records fall back to defaults.
    pub async fn load(&self, key: &CacheKey) -> Result<Option<StoredEntry>, StoreError> {
        let Some(stored) = self.store.get_stream(key.as_str()).await? else {
            return Ok(None);
        };
        let media_type = self
            .store
            .get_string(&key.sub_key(SubKey::MediaType))
            .await?
            .filter(|m| !m.is_empty());
        let protocol = self.store.get_string(&key.sub_key(SubKey::Protocol)).await?;
        let message = self.store.get_string(&key.sub_key(SubKey::Message)).await?;
        let headers = self.store.get_string(&key.sub_key(SubKey::Headers)).await?;

        Ok(Some(StoredEntry {
            body: ResponseBody::from_stream(media_type, stored.len, stored.stream),
            protocol: Protocol::parse_or_default(protocol.as_deref()),
            message: message.unwrap_or_default(),
            headers: decode_headers(headers.as_deref()),
        }))
    }

    pub async fn contains(&self, key: &CacheKey) -> Result<bool, StoreError> {
        self.store.contains_key(key.as_str()).await
    }

    /// Remove every record of the entry; true if the body record existed.
    pub async fn remove(&self, key: &CacheKey) -> Result<bool, StoreError> {
        for record in SubKey::ALL {
            self.store.remove(&key.sub_key(record)).await?;
        }
        self.store.remove(key.as_str()).await
    }
}
