//! Usage analytics
//!
//! Off the hot path. Rollups over the persisted interaction log are
//! cached for a short window (default 15 minutes) and recomputed on
//! expiry — the same expiry-on-read pattern as the response cache, at
//! coarser granularity. A stale rollup is never served past its window.

pub mod rollup;

pub use rollup::{
    EngagementMetrics, QueryLog, QueryMetrics, QueryRecord, UsageAnalytics, UsageAnalyticsConfig,
};
