//! Last computed candidate list per event.
//!
//! Entries are keyed by event id only. `min_score` and `limit` are applied when reading,
//! because scoring does not depend on them; custom keywords do change scoring, so the
//! normalized keywords an entry was computed with are stored alongside it and compared
//! by the engine. There is no time-based expiry: entries are replaced on refresh or
//! removed through [`CandidateCache::invalidate`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use moka::{policy::EvictionPolicy, sync::Cache};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::{keywords::KeywordSet, prefilter::PrefilterReport, scoring::Candidate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub event_id: i64,
    /// Normalized request keywords; `None` when the request supplied none.
    pub custom_keywords: Option<Vec<String>>,
    pub keyword_snapshot: KeywordSet,
    /// Scored, unranked candidates.
    pub candidates: Vec<Candidate>,
    pub prefilter_report: PrefilterReport,
    pub computation_id: String,
    pub computed_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn matches_custom_keywords(&self, custom_keywords: Option<&[String]>) -> bool {
        self.custom_keywords.as_deref() == custom_keywords
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage contract for computed candidate lists.
///
/// Failures are reported, never fatal: the engine treats a failed read as a miss and a
/// failed write as "not cached".
pub trait CandidateCache: Send + Sync {
    fn get(&self, event_id: i64) -> Result<Option<Arc<CacheEntry>>, CacheError>;

    /// Stores or wholesale replaces the entry for `entry.event_id`.
    fn put(&self, entry: CacheEntry) -> Result<(), CacheError>;

    fn invalidate(&self, event_id: i64) -> Result<(), CacheError>;
}

/// In-process cache bounded by entry count, with no expiry.
///
/// Runs moka with its LRU policy: every `put` is admitted and, once over capacity, the
/// least recently used event is evicted.
pub struct InMemoryCandidateCache {
    entries: Cache<i64, Arc<CacheEntry>>,
}

impl InMemoryCandidateCache {
    pub const DEFAULT_CAPACITY: u64 = 1_000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCandidateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateCache for InMemoryCandidateCache {
    fn get(&self, event_id: i64) -> Result<Option<Arc<CacheEntry>>, CacheError> {
        Ok(self.entries.get(&event_id))
    }

    fn put(&self, entry: CacheEntry) -> Result<(), CacheError> {
        self.entries.insert(entry.event_id, Arc::new(entry));
        Ok(())
    }

    fn invalidate(&self, event_id: i64) -> Result<(), CacheError> {
        self.entries.invalidate(&event_id);
        Ok(())
    }
}

/// Cache that stores nothing; every lookup misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl CandidateCache for NoCache {
    fn get(&self, _event_id: i64) -> Result<Option<Arc<CacheEntry>>, CacheError> {
        Ok(None)
    }

    fn put(&self, _entry: CacheEntry) -> Result<(), CacheError> {
        Ok(())
    }

    fn invalidate(&self, _event_id: i64) -> Result<(), CacheError> {
        Ok(())
    }
}
