//! Two-tier cache store
//!
//! Memory tier: concurrent map, fastest path. Disk tier: one JSON file
//! per fingerprint under a configured root, written atomically
//! (temp-file-then-rename) so concurrent writers to the same key never
//! corrupt an entry. Disk is the durable source; memory is a promotion
//! cache populated on disk hits with the disk entry's exact content and
//! timestamp, never refreshed.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use agri_voice_config::constants;
use agri_voice_core::Clock;

use crate::fingerprint::fingerprint;
use crate::similarity::jaccard;
use crate::CacheError;

/// Cache store configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Root directory for the disk tier
    pub dir: PathBuf,
    /// Time-to-live for every entry in this cache instance
    pub ttl: Duration,
    /// Minimum Jaccard similarity for [`ResponseCache::find_similar`]
    pub similarity_threshold: f64,
}

impl CacheConfig {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            similarity_threshold: constants::cache::SIMILARITY_THRESHOLD,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(
            constants::cache::DEFAULT_DIR,
            Duration::hours(constants::cache::DEFAULT_TTL_HOURS),
        )
    }
}

/// Persisted cache entry: the payload plus the request attributes it was
/// computed from and its creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry<T> {
    query: String,
    response: T,
    context: String,
    language: String,
    timestamp: DateTime<Utc>,
    access_count: u64,
}

/// A fuzzy-lookup match from [`ResponseCache::find_similar`]
#[derive(Debug, Clone)]
pub struct SimilarQuery<T> {
    /// The cached entry's original query text
    pub query: String,
    /// Jaccard similarity to the lookup query, in [0, 1]
    pub similarity: f64,
    pub response: T,
}

/// Cache performance statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub memory_hits: u64,
    pub disk_hits: u64,
    pub hit_rate_percent: f64,
    pub memory_count: usize,
    pub disk_count: usize,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    memory_hits: AtomicU64,
    disk_hits: AtomicU64,
}

impl Counters {
    fn reset(&self) {
        self.hits.store(0, AtomicOrdering::Relaxed);
        self.misses.store(0, AtomicOrdering::Relaxed);
        self.memory_hits.store(0, AtomicOrdering::Relaxed);
        self.disk_hits.store(0, AtomicOrdering::Relaxed);
    }
}

/// Two-tier response cache, generic over the cached payload type
pub struct ResponseCache<T> {
    config: CacheConfig,
    memory: DashMap<String, CacheEntry<T>>,
    counters: Counters,
    clock: Arc<dyn Clock>,
}

impl<T> ResponseCache<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a cache, ensuring the disk root exists
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        fs::create_dir_all(&config.dir).map_err(|e| {
            CacheError::Directory(format!("{}: {e}", config.dir.display()))
        })?;

        Ok(Self {
            config,
            memory: DashMap::new(),
            counters: Counters::default(),
            clock,
        })
    }

    /// Look up by request attributes (computes the fingerprint)
    pub fn get(&self, query: &str, context: &str, language: &str) -> Option<T> {
        self.get_by_key(&fingerprint(query, context, language))
    }

    /// Look up by precomputed fingerprint.
    ///
    /// Memory tier first; a valid disk entry is promoted into memory
    /// unchanged. Expired entries are evicted lazily here. Exactly one of
    /// hits/misses is recorded per call.
    pub fn get_by_key(&self, key: &str) -> Option<T> {
        let mut expired_in_memory = false;
        if let Some(entry) = self.memory.get(key) {
            if self.is_valid(&entry.timestamp) {
                self.counters.hits.fetch_add(1, AtomicOrdering::Relaxed);
                self.counters.memory_hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Some(entry.response.clone());
            }
            expired_in_memory = true;
        }
        if expired_in_memory {
            self.memory.remove(key);
        }

        let path = self.file_path(key);
        if let Some(entry) = self.read_disk_entry(&path) {
            if self.is_valid(&entry.timestamp) {
                // Promote with the disk entry's exact timestamp
                self.memory.insert(key.to_string(), entry.clone());
                self.counters.hits.fetch_add(1, AtomicOrdering::Relaxed);
                self.counters.disk_hits.fetch_add(1, AtomicOrdering::Relaxed);
                return Some(entry.response);
            }
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "failed to remove expired cache file");
            }
        }

        self.counters.misses.fetch_add(1, AtomicOrdering::Relaxed);
        None
    }

    /// Store a payload, returning its fingerprint.
    ///
    /// Memory tier is written unconditionally; the disk write is best
    /// effort and a failure degrades this entry to memory-only.
    pub fn put(&self, query: &str, context: &str, language: &str, response: T) -> String {
        let key = fingerprint(query, context, language);
        let entry = CacheEntry {
            query: query.to_string(),
            response,
            context: context.to_string(),
            language: language.to_string(),
            timestamp: self.clock.now(),
            access_count: 1,
        };

        self.memory.insert(key.clone(), entry.clone());

        if let Err(e) = self.write_disk_entry(&key, &entry) {
            warn!(key = %key, error = %e, "cache disk write failed, entry is memory-only");
        }

        key
    }

    /// Find valid memory-tier entries whose query is Jaccard-similar to
    /// `query` at or above the configured threshold, most similar first
    /// (ties broken by fingerprint for deterministic ordering).
    pub fn find_similar(&self, query: &str) -> Vec<SimilarQuery<T>> {
        let mut matches: Vec<(String, SimilarQuery<T>)> = Vec::new();

        for entry in self.memory.iter() {
            if !self.is_valid(&entry.timestamp) {
                continue;
            }
            let similarity = jaccard(query, &entry.query);
            if similarity >= self.config.similarity_threshold {
                matches.push((
                    entry.key().clone(),
                    SimilarQuery {
                        query: entry.query.clone(),
                        similarity,
                        response: entry.response.clone(),
                    },
                ));
            }
        }

        matches.sort_by(|a, b| {
            b.1.similarity
                .partial_cmp(&a.1.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        matches.into_iter().map(|(_, m)| m).collect()
    }

    /// Evict every expired entry from both tiers.
    ///
    /// Safe to run concurrently with `get`/`put`: readers treat an entry
    /// that vanishes mid-scan as a miss.
    pub fn cleanup_expired(&self) {
        let before = self.memory.len();
        self.memory.retain(|_, entry| self.is_valid(&entry.timestamp));
        let evicted = before.saturating_sub(self.memory.len());

        let mut disk_evicted = 0usize;
        if let Ok(dir) = fs::read_dir(&self.config.dir) {
            for file in dir.flatten() {
                let path = file.path();
                // Temp files only exist between write and rename; one left
                // behind is an orphan from an interrupted write.
                if path.extension().map(|e| e == "tmp") == Some(true) {
                    if fs::remove_file(&path).is_ok() {
                        disk_evicted += 1;
                    }
                    continue;
                }
                if path.extension().map(|e| e == "json") != Some(true) {
                    continue;
                }
                if let Some(entry) = self.read_disk_entry(&path) {
                    if !self.is_valid(&entry.timestamp) {
                        if fs::remove_file(&path).is_ok() {
                            disk_evicted += 1;
                        }
                    }
                }
            }
        }

        debug!(
            memory_evicted = evicted,
            disk_evicted, "cleaned up expired cache entries"
        );
    }

    /// Current statistics. The hit accounting invariant holds:
    /// `hits + misses` equals the number of `get` calls observed since
    /// start or the last `clear`.
    pub fn stats(&self) -> CacheStats {
        let hits = self.counters.hits.load(AtomicOrdering::Relaxed);
        let misses = self.counters.misses.load(AtomicOrdering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            round2(hits as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        CacheStats {
            total_requests: total,
            hits,
            misses,
            memory_hits: self.counters.memory_hits.load(AtomicOrdering::Relaxed),
            disk_hits: self.counters.disk_hits.load(AtomicOrdering::Relaxed),
            hit_rate_percent: hit_rate,
            memory_count: self.memory.len(),
            disk_count: self.disk_count(),
        }
    }

    /// Empty both tiers and reset counters
    pub fn clear(&self) {
        self.memory.clear();

        if let Ok(dir) = fs::read_dir(&self.config.dir) {
            for file in dir.flatten() {
                let path = file.path();
                let ext = path.extension();
                if ext.map(|e| e == "json") == Some(true) || ext.map(|e| e == "tmp") == Some(true) {
                    if let Err(e) = fs::remove_file(&path) {
                        warn!(path = %path.display(), error = %e, "failed to remove cache file");
                    }
                }
            }
        }

        self.counters.reset();
        debug!("cache cleared");
    }

    /// Expiry check: exclusive at the boundary, so an entry exactly at
    /// `timestamp + ttl` is already expired.
    fn is_valid(&self, timestamp: &DateTime<Utc>) -> bool {
        self.clock.now() < *timestamp + self.config.ttl
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.config.dir.join(format!("{key}.json"))
    }

    fn read_disk_entry(&self, path: &Path) -> Option<CacheEntry<T>> {
        if !path.exists() {
            return None;
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache disk read failed, treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed cache entry, treating as miss");
                None
            }
        }
    }

    fn write_disk_entry(&self, key: &str, entry: &CacheEntry<T>) -> io::Result<()> {
        let serialized = serde_json::to_string_pretty(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let path = self.file_path(key);
        // Per-write unique temp name: concurrent puts for the same key must
        // not share a temp file, or one rename could publish a torn write.
        let tmp = self
            .config
            .dir
            .join(format!("{key}.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &path)
    }

    fn disk_count(&self) -> usize {
        fs::read_dir(&self.config.dir)
            .map(|dir| {
                dir.flatten()
                    .filter(|f| f.path().extension().map(|e| e == "json") == Some(true))
                    .count()
            })
            .unwrap_or(0)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
