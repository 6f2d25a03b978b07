//! Rollup computation and caching

use std::collections::HashMap;
use std::sync::Arc;

use agri_voice_core::{Clock, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One persisted interaction record, as the log collaborator reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub user_id: String,
    pub intent: String,
    pub language: String,
    pub processing_ms: u64,
    pub cache_hit: bool,
    pub timestamp: DateTime<Utc>,
}

/// Read-side access to the persisted interaction log
#[async_trait]
pub trait QueryLog: Send + Sync + 'static {
    /// All records at or after `cutoff`
    async fn records_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<QueryRecord>>;
}

/// Engagement rollup for a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub period_days: i64,
    pub active_users: usize,
    pub total_queries: usize,
    pub avg_queries_per_user: f64,
}

/// Query-pattern rollup for a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    pub period_days: i64,
    pub total_queries: usize,
    /// Intent -> count, most frequent first
    pub top_intents: Vec<(String, usize)>,
    /// Language code -> count, most frequent first
    pub language_distribution: Vec<(String, usize)>,
    pub avg_processing_ms: f64,
    pub cache_hit_rate_percent: f64,
}

/// Analytics configuration
#[derive(Debug, Clone)]
pub struct UsageAnalyticsConfig {
    /// How long a computed rollup stays valid
    pub rollup_ttl: Duration,
}

impl Default for UsageAnalyticsConfig {
    fn default() -> Self {
        Self {
            rollup_ttl: Duration::minutes(15),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RollupKey {
    metric: &'static str,
    period_days: i64,
}

struct CachedRollup {
    value: serde_json::Value,
    computed_at: DateTime<Utc>,
}

/// Cached rollup computer over the interaction log
pub struct UsageAnalytics {
    config: UsageAnalyticsConfig,
    log: Arc<dyn QueryLog>,
    cache: DashMap<RollupKey, CachedRollup>,
    clock: Arc<dyn Clock>,
}

impl UsageAnalytics {
    pub fn new(
        config: UsageAnalyticsConfig,
        log: Arc<dyn QueryLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            log,
            cache: DashMap::new(),
            clock,
        }
    }

    /// Engagement rollup for the trailing `days` window
    pub async fn engagement_metrics(&self, days: i64) -> Result<EngagementMetrics> {
        let key = RollupKey {
            metric: "engagement",
            period_days: days,
        };
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let records = self.records_for(days).await?;
        let mut users: Vec<&str> = records.iter().map(|r| r.user_id.as_str()).collect();
        users.sort_unstable();
        users.dedup();

        let active_users = users.len();
        let total_queries = records.len();
        let avg = if active_users > 0 {
            round2(total_queries as f64 / active_users as f64)
        } else {
            0.0
        };

        let metrics = EngagementMetrics {
            period_days: days,
            active_users,
            total_queries,
            avg_queries_per_user: avg,
        };
        self.store(key, &metrics);
        Ok(metrics)
    }

    /// Query-pattern rollup for the trailing `days` window
    pub async fn query_metrics(&self, days: i64) -> Result<QueryMetrics> {
        let key = RollupKey {
            metric: "queries",
            period_days: days,
        };
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let records = self.records_for(days).await?;
        let total = records.len();

        let mut intents: HashMap<&str, usize> = HashMap::new();
        let mut languages: HashMap<&str, usize> = HashMap::new();
        let mut total_ms = 0u64;
        let mut cache_hits = 0usize;
        for record in &records {
            *intents.entry(record.intent.as_str()).or_default() += 1;
            *languages.entry(record.language.as_str()).or_default() += 1;
            total_ms += record.processing_ms;
            if record.cache_hit {
                cache_hits += 1;
            }
        }

        let metrics = QueryMetrics {
            period_days: days,
            total_queries: total,
            top_intents: ranked(intents),
            language_distribution: ranked(languages),
            avg_processing_ms: if total > 0 {
                round2(total_ms as f64 / total as f64)
            } else {
                0.0
            },
            cache_hit_rate_percent: if total > 0 {
                round2(cache_hits as f64 / total as f64 * 100.0)
            } else {
                0.0
            },
        };
        self.store(key, &metrics);
        Ok(metrics)
    }

    async fn records_for(&self, days: i64) -> Result<Vec<QueryRecord>> {
        let cutoff = self.clock.now() - Duration::days(days);
        self.log.records_since(cutoff).await
    }

    /// Expiry-on-read: an entry past its window is dropped, never served
    fn cached<T: serde::de::DeserializeOwned>(&self, key: &RollupKey) -> Option<T> {
        let expired = match self.cache.get(key) {
            Some(entry) => {
                if self.clock.now() < entry.computed_at + self.config.rollup_ttl {
                    return serde_json::from_value(entry.value.clone()).ok();
                }
                true
            }
            None => false,
        };
        if expired {
            self.cache.remove(key);
            debug!(metric = key.metric, "rollup expired, recomputing");
        }
        None
    }

    fn store<T: Serialize>(&self, key: RollupKey, value: &T) {
        if let Ok(value) = serde_json::to_value(value) {
            self.cache.insert(
                key,
                CachedRollup {
                    value,
                    computed_at: self.clock.now(),
                },
            );
        }
    }
}

/// Count map -> (name, count) pairs, most frequent first, name-tie-broken
fn ranked(counts: HashMap<&str, usize>) -> Vec<(String, usize)> {
    let mut pairs: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_voice_core::ManualClock;
    use parking_lot::RwLock;

    struct FakeLog {
        records: RwLock<Vec<QueryRecord>>,
    }

    impl FakeLog {
        fn new() -> Self {
            Self {
                records: RwLock::new(Vec::new()),
            }
        }

        fn push(&self, user: &str, intent: &str, language: &str, at: DateTime<Utc>) {
            self.records.write().push(QueryRecord {
                user_id: user.to_string(),
                intent: intent.to_string(),
                language: language.to_string(),
                processing_ms: 100,
                cache_hit: false,
                timestamp: at,
            });
        }
    }

    #[async_trait]
    impl QueryLog for FakeLog {
        async fn records_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<QueryRecord>> {
            Ok(self
                .records
                .read()
                .iter()
                .filter(|r| r.timestamp >= cutoff)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_query_metrics_rollup() {
        let clock = Arc::new(ManualClock::starting_now());
        let log = Arc::new(FakeLog::new());
        let now = clock.now();
        log.push("u1", "crop_advice", "hi", now);
        log.push("u1", "crop_advice", "en", now);
        log.push("u2", "irrigation", "hi", now);

        let analytics =
            UsageAnalytics::new(UsageAnalyticsConfig::default(), log, clock);
        let metrics = analytics.query_metrics(7).await.unwrap();

        assert_eq!(metrics.total_queries, 3);
        assert_eq!(metrics.top_intents[0], ("crop_advice".to_string(), 2));
        assert_eq!(metrics.language_distribution[0], ("hi".to_string(), 2));
        assert_eq!(metrics.avg_processing_ms, 100.0);
    }

    #[tokio::test]
    async fn test_engagement_metrics_counts_distinct_users() {
        let clock = Arc::new(ManualClock::starting_now());
        let log = Arc::new(FakeLog::new());
        let now = clock.now();
        log.push("u1", "weather", "en", now);
        log.push("u1", "weather", "en", now);
        log.push("u2", "weather", "en", now);

        let analytics =
            UsageAnalytics::new(UsageAnalyticsConfig::default(), log, clock);
        let metrics = analytics.engagement_metrics(7).await.unwrap();

        assert_eq!(metrics.active_users, 2);
        assert_eq!(metrics.total_queries, 3);
        assert_eq!(metrics.avg_queries_per_user, 1.5);
    }

    #[tokio::test]
    async fn test_rollup_served_from_cache_within_ttl() {
        let clock = Arc::new(ManualClock::starting_now());
        let log = Arc::new(FakeLog::new());
        log.push("u1", "weather", "en", clock.now());

        let analytics = UsageAnalytics::new(
            UsageAnalyticsConfig::default(),
            Arc::clone(&log) as Arc<dyn QueryLog>,
            clock.clone(),
        );

        let first = analytics.query_metrics(7).await.unwrap();
        assert_eq!(first.total_queries, 1);

        // New record inside the TTL window: cached rollup still served
        log.push("u2", "weather", "en", clock.now());
        clock.advance(Duration::minutes(5));
        let second = analytics.query_metrics(7).await.unwrap();
        assert_eq!(second.total_queries, 1);
    }

    #[tokio::test]
    async fn test_stale_rollup_never_served_past_window() {
        let clock = Arc::new(ManualClock::starting_now());
        let log = Arc::new(FakeLog::new());
        log.push("u1", "weather", "en", clock.now());

        let analytics = UsageAnalytics::new(
            UsageAnalyticsConfig::default(),
            Arc::clone(&log) as Arc<dyn QueryLog>,
            clock.clone(),
        );
        analytics.query_metrics(7).await.unwrap();

        log.push("u2", "weather", "en", clock.now());
        clock.advance(Duration::minutes(16));
        let recomputed = analytics.query_metrics(7).await.unwrap();
        assert_eq!(recomputed.total_queries, 2);
    }

    #[tokio::test]
    async fn test_empty_log_guards_division() {
        let clock = Arc::new(ManualClock::starting_now());
        let analytics = UsageAnalytics::new(
            UsageAnalyticsConfig::default(),
            Arc::new(FakeLog::new()),
            clock,
        );
        let metrics = analytics.engagement_metrics(7).await.unwrap();
        assert_eq!(metrics.avg_queries_per_user, 0.0);
        let queries = analytics.query_metrics(7).await.unwrap();
        assert_eq!(queries.avg_processing_ms, 0.0);
    }
}
