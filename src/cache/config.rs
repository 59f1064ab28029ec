//! Cache configuration.

use crate::{Error, ErrorContext, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Sub-directory created under the platform cache directory.
pub const DEFAULT_CACHE_DIR_NAME: &str = "ResponseCache";
/// Reason phrase given to responses served from disk after a network failure.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "DISK_CACHE";

/// What to do when a successful response cannot be written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFailurePolicy {
    /// Surface [`Error::Store`] to the caller.
    #[default]
    Fail,
    /// Log the fault and return the live response uncached.
    ServeLive,
}

impl std::str::FromStr for StoreFailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(StoreFailurePolicy::Fail),
            "serve_live" | "serve-live" => Ok(StoreFailurePolicy::ServeLive),
            other => Err(Error::configuration_with_context(
                "unknown store failure policy",
                ErrorContext::new()
                    .with_field_path("store_failure")
                    .with_details(format!("got {:?}, expected fail or serve_live", other))
                    .with_source("cache_config"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub cache_dir: PathBuf,
    pub fallback_message: String,
    pub store_failure: StoreFailurePolicy,
    /// Serialize store-and-reread and fallback reads per cache key.
    pub lock_writes: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            store_failure: StoreFailurePolicy::default(),
            lock_writes: true,
        }
    }
}

/// `<platform cache dir>/ResponseCache`, or under the temp dir when there is no home.
pub fn default_cache_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(env::temp_dir)
        .join(DEFAULT_CACHE_DIR_NAME)
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn with_store_failure(mut self, policy: StoreFailurePolicy) -> Self {
        self.store_failure = policy;
        self
    }

    pub fn with_lock_writes(mut self, lock: bool) -> Self {
        self.lock_writes = lock;
        self
    }

    /// Defaults overridden by `RESPONSE_CACHE_DIR`, `RESPONSE_CACHE_FALLBACK_MESSAGE`
    /// and `RESPONSE_CACHE_STORE_FAILURE`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(dir) = env::var("RESPONSE_CACHE_DIR") {
            if !dir.is_empty() {
                config.cache_dir = PathBuf::from(dir);
            }
        }
        if let Ok(message) = env::var("RESPONSE_CACHE_FALLBACK_MESSAGE") {
            if !message.is_empty() {
                config.fallback_message = message;
            }
        }
        if let Ok(policy) = env::var("RESPONSE_CACHE_STORE_FAILURE") {
            config.store_failure = policy.parse()?;
        }
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                "invalid cache configuration",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("cache_config"),
            )
        })
    }
}
