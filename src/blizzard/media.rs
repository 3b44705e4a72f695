//! Memoization for media-document lookups.
//!
//! Creature display ids repeat across encounters, so the crawl funnels all
//! media fetches through this cache. Population is single-flight per key;
//! a failed fetch is cached as absent for the rest of the run so a known-bad
//! resource is not retried.

use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use crate::blizzard::{ApiClient, Fetched};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub path: String,
    pub namespace: String,
    pub locale: String,
}

#[derive(Default)]
pub struct MediaCache {
    entries: Mutex<HashMap<MediaKey, Arc<OnceCell<Option<Value>>>>>,
}

impl MediaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the media document at `path` through the client, memoized on
    /// (path, namespace, locale). `None` means the fetch failed or 404'd.
    pub async fn fetch(&self, client: &ApiClient, path: &str, namespace: &str) -> Option<Value> {
        let key = MediaKey {
            path: path.to_string(),
            namespace: namespace.to_string(),
            locale: client.locale().to_string(),
        };
        self.get_or_fetch(key, || async {
            match client.get(path, namespace, &[]).await {
                Ok(Fetched::Json(value)) => Some(value),
                Ok(Fetched::NotFound) => None,
                Err(e) => {
                    tracing::warn!("media fetch failed for {}: {:#}", path, e);
                    None
                }
            }
        })
        .await
    }

    /// Memoized lookup: at most one `fetch` runs per key, no matter how many
    /// tasks ask concurrently; the rest await the same cell.
    pub async fn get_or_fetch<F, Fut>(&self, key: MediaKey, fetch: F) -> Option<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<Value>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(key).or_default())
        };
        cell.get_or_init(fetch).await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Pulls the asset value with an exact key (e.g. "tile", "zoom") out of a
/// media document's `assets` list.
pub fn asset_value(doc: &Value, key: &str) -> Option<String> {
    asset_matching(doc, |k| k == key)
}

/// Like [`asset_value`] but matches on a key suffix; class icons come back
/// under keys ending in "icon".
pub fn asset_value_with_suffix(doc: &Value, suffix: &str) -> Option<String> {
    asset_matching(doc, |k| k.ends_with(suffix))
}

fn asset_matching(doc: &Value, pred: impl Fn(&str) -> bool) -> Option<String> {
    doc.get("assets")?
        .as_array()?
        .iter()
        .find(|asset| {
            asset
                .get("key")
                .and_then(Value::as_str)
                .map_or(false, &pred)
        })
        .and_then(|asset| asset.get("value").and_then(Value::as_str))
        .map(str::to_owned)
}
