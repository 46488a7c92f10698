//! Coordinate-bucketed weather cache with a freshness TTL.
//!
//! Keys round latitude/longitude to two decimals (about 1.1 km), so nearby
//! requests share an entry. Entries stay in the map after they expire; the
//! service decides whether a stale entry is good enough. When the map grows
//! past `max_entries`, the oldest fetches are evicted first.
//!
//! Persistence is best effort: disk errors are logged and the in-memory
//! state stays authoritative.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dressday_core::{CacheConfig, Clock};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::types::{WeatherError, WeatherSnapshot};

/// Default freshness window
pub const DEFAULT_TTL_MINUTES: i64 = 60;
/// Default bound on stored entries
pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub data: WeatherSnapshot,
    pub fetched_at: DateTime<Utc>,
    pub cache_expiry: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.cache_expiry
    }
}

fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // -0.00 and 0.00 must share a bucket
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Cache key for a coordinate pair, e.g. `"42.36,-71.06"`.
pub fn cache_key(lat: f64, lon: f64) -> String {
    format!("{:.2},{:.2}", round2(lat), round2(lon))
}

pub struct WeatherCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
    cache_path: Option<PathBuf>,
}

impl std::fmt::Debug for WeatherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherCache")
            .field("entries", &self.entries.read().len())
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .field("cache_path", &self.cache_path)
            .finish()
    }
}

impl WeatherCache {
    /// In-memory cache with the given TTL and capacity
    pub fn new(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
            clock,
            cache_path: None,
        }
    }

    pub fn from_config(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.ttl(), config.max_entries, clock)
    }

    /// Back the cache with a JSON file in `config_dir`, loading whatever is there.
    /// An unreadable file is logged and ignored.
    pub fn with_persistence(mut self, config_dir: &Path) -> Self {
        let cache_path = config_dir.join("weather_cache.json");
        match read_entries(&cache_path) {
            Ok(loaded) => {
                tracing::debug!("Loaded {} cached weather entries", loaded.len());
                let mut entries = self.entries.write();
                for entry in loaded {
                    entries.insert(entry.key.clone(), entry);
                }
            }
            Err(e) => tracing::warn!("Ignoring weather cache file: {}", e),
        }
        self.cache_path = Some(cache_path);
        self.evict_oldest();
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached entry for the coordinate bucket, fresh or not.
    pub fn get(&self, lat: f64, lon: f64) -> Option<CacheEntry> {
        let key = cache_key(lat, lon);
        let entry = self.entries.read().get(&key).cloned();
        match &entry {
            Some(e) => tracing::debug!(key = %key, fresh = self.is_fresh(e), "Weather cache hit"),
            None => tracing::debug!(key = %key, "Weather cache miss"),
        }
        entry
    }

    /// True while the entry is inside its freshness window.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.is_fresh_at(self.clock.now())
    }

    /// Store a snapshot fetched now, then evict down to capacity.
    pub fn set(&self, lat: f64, lon: f64, snapshot: WeatherSnapshot) -> CacheEntry {
        let now = self.clock.now();
        let entry = CacheEntry {
            key: cache_key(lat, lon),
            data: snapshot,
            fetched_at: now,
            cache_expiry: now + self.ttl,
        };

        self.entries
            .write()
            .insert(entry.key.clone(), entry.clone());
        self.evict_oldest();
        self.persist();
        entry
    }

    pub fn remove(&self, lat: f64, lon: f64) -> Option<CacheEntry> {
        let removed = self.entries.write().remove(&cache_key(lat, lon));
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn evict_oldest(&self) {
        let mut entries = self.entries.write();
        if entries.len() <= self.max_entries {
            return;
        }

        let mut by_age: Vec<(DateTime<Utc>, String)> = entries
            .values()
            .map(|e| (e.fetched_at, e.key.clone()))
            .collect();
        by_age.sort();

        let excess = entries.len() - self.max_entries;
        for (_, key) in by_age.into_iter().take(excess) {
            tracing::debug!(key = %key, "Evicting weather cache entry");
            entries.remove(&key);
        }
    }

    fn persist(&self) {
        let Some(path) = &self.cache_path else {
            return;
        };
        let snapshot: Vec<CacheEntry> = self.entries.read().values().cloned().collect();
        if let Err(e) = write_entries(path, &snapshot) {
            tracing::warn!("Failed to persist weather cache: {}", e);
        }
    }
}

fn read_entries(path: &Path) -> Result<Vec<CacheEntry>, WeatherError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| WeatherError::Cache(format!("read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| WeatherError::Cache(format!("parse {}: {}", path.display(), e)))
}

fn write_entries(path: &Path, entries: &[CacheEntry]) -> Result<(), WeatherError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| WeatherError::Cache(format!("create {}: {}", parent.display(), e)))?;
    }
    let json = serde_json::to_string(entries).map_err(|e| WeatherError::Cache(e.to_string()))?;
    // Write-then-rename keeps a reader from ever seeing half a file
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .map_err(|e| WeatherError::Cache(format!("write {}: {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| WeatherError::Cache(format!("rename {}: {}", path.display(), e)))
}
