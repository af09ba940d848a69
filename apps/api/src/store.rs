//! Key-value persistence for the last analysis result and the theme preference.
//!
//! Two fixed string keys, the same ones the browser build used in local storage.
//! Redis backs the store when `REDIS_URL` is configured; otherwise values live in
//! process memory and disappear on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::{AnalysisResult, Theme};

pub const RESULT_KEY: &str = "skillGap_result";
pub const THEME_KEY: &str = "skillGap_theme";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Backends
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }
}

#[async_trait]
impl StateStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Picks the backend from configuration.
pub fn create_store(redis_url: Option<&str>) -> Result<Arc<dyn StateStore>, StoreError> {
    match redis_url {
        Some(url) => {
            info!("Persisting dashboard state in Redis");
            Ok(Arc::new(RedisStore::open(url)?))
        }
        None => {
            info!("REDIS_URL not set, persisting dashboard state in memory");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typed helpers
// ────────────────────────────────────────────────────────────────────────────

pub async fn save_result(store: &dyn StateStore, result: &AnalysisResult) -> Result<(), StoreError> {
    let text = serde_json::to_string(result)?;
    store.set(RESULT_KEY, &text).await
}

pub async fn clear_result(store: &dyn StateStore) -> Result<(), StoreError> {
    store.delete(RESULT_KEY).await
}

pub async fn save_theme(store: &dyn StateStore, theme: Theme) -> Result<(), StoreError> {
    store.set(THEME_KEY, theme.as_str()).await
}

pub async fn clear_theme(store: &dyn StateStore) -> Result<(), StoreError> {
    store.delete(THEME_KEY).await
}

/// Parses and validates a persisted result. Corrupt or out-of-range data yields `None`,
/// never an error.
pub fn decode_result(text: &str) -> Option<AnalysisResult> {
    let result = match serde_json::from_str::<AnalysisResult>(text) {
        Ok(result) => result,
        Err(e) => {
            warn!("Failed to restore state: {e}");
            return None;
        }
    };

    match result.validated() {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("Ignoring invalid cached analysis: {e}");
            None
        }
    }
}

/// Loads whatever was cached by a previous session. Any failure (unreachable store,
/// corrupt JSON, unknown theme) is logged and treated as "nothing cached".
pub async fn load_cached(store: &dyn StateStore) -> (Option<AnalysisResult>, Option<Theme>) {
    let result = match store.get(RESULT_KEY).await {
        Ok(Some(text)) => decode_result(&text),
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read cached analysis: {e}");
            None
        }
    };

    let theme = match store.get(THEME_KEY).await {
        Ok(Some(text)) => {
            let theme = Theme::parse(&text);
            if theme.is_none() {
                warn!("Ignoring unknown cached theme '{text}'");
            }
            theme
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read cached theme: {e}");
            None
        }
    };

    (result, theme)
}
