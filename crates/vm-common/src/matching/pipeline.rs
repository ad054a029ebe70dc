use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::{
    keywords::{KeywordSet, derive_keywords},
    prefilter::{CandidatePrefilter, PrefilterConfig, PrefilterReport},
    ranking::{CandidateResults, ResultAssembler},
    scoring::{Candidate, ScoringConfig, ScoringEngine},
};
use crate::{
    Event, Volunteer,
    api::CandidateRequest,
    cache::{CacheEntry, CacheError, CandidateCache, InMemoryCandidateCache},
    run_id,
    store::{EventStore, ParticipationStore, StoreError, VolunteerFilter, VolunteerStore},
};

#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("event {0} not found")]
    EventNotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct MatchingEngineConfig {
    pub prefilter: PrefilterConfig,
    pub scoring: ScoringConfig,
    /// Entry bound for the in-memory cache built by [`MatchingEngine::new`].
    pub cache_capacity: u64,
    /// List every volunteer so the prefilter report names each governance exclusion.
    /// When off, the store is asked for contactable volunteers only and the report
    /// covers whatever it still returned.
    pub governance_audit: bool,
}

impl Default for MatchingEngineConfig {
    fn default() -> Self {
        Self {
            prefilter: PrefilterConfig::default(),
            scoring: ScoringConfig::default(),
            cache_capacity: InMemoryCandidateCache::DEFAULT_CAPACITY,
            governance_audit: true,
        }
    }
}

impl MatchingEngineConfig {
    /// Reads `VM_PREFILTER_MAX_CANDIDATES`, `VM_CACHE_CAPACITY` and `VM_GOVERNANCE_AUDIT`
    /// (`0`/`false` turns the audit off).
    pub fn from_env() -> Self {
        Self {
            prefilter: PrefilterConfig::from_env(),
            cache_capacity: std::env::var("VM_CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(InMemoryCandidateCache::DEFAULT_CAPACITY),
            governance_audit: std::env::var("VM_GOVERNANCE_AUDIT")
                .map(|value| !(value == "0" || value.eq_ignore_ascii_case("false")))
                .unwrap_or(true),
            ..Self::default()
        }
    }
}

/// Scored candidates for one event, before `min_score`/`limit` are applied.
struct Computation {
    keyword_set: KeywordSet,
    scored: Vec<Candidate>,
    prefilter_report: PrefilterReport,
}

pub struct MatchingEngine {
    events: Arc<dyn EventStore>,
    volunteers: Arc<dyn VolunteerStore>,
    participation: Option<Arc<dyn ParticipationStore>>,
    cache: Arc<dyn CandidateCache>,
    prefilter: CandidatePrefilter,
    scoring: ScoringEngine,
    volunteer_filter: VolunteerFilter,
}

impl MatchingEngine {
    pub fn new(
        config: MatchingEngineConfig,
        events: Arc<dyn EventStore>,
        volunteers: Arc<dyn VolunteerStore>,
    ) -> Self {
        Self {
            events,
            volunteers,
            participation: None,
            cache: Arc::new(InMemoryCandidateCache::with_capacity(config.cache_capacity)),
            prefilter: CandidatePrefilter::new(config.prefilter),
            scoring: ScoringEngine::new(config.scoring),
            volunteer_filter: if config.governance_audit {
                VolunteerFilter::all()
            } else {
                VolunteerFilter::contactable()
            },
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn CandidateCache>) -> Self {
        self.cache = cache;
        self
    }

    /// History from this store replaces whatever the volunteer records carry.
    pub fn with_participation_store(mut self, store: Arc<dyn ParticipationStore>) -> Self {
        self.participation = Some(store);
        self
    }

    pub fn compute_candidates(
        &self,
        request: &CandidateRequest,
    ) -> Result<CandidateResults, MatchingError> {
        self.compute_candidates_at(request, Utc::now())
    }

    /// Ranked candidates for `request.event_id`, with recency measured against `now`.
    ///
    /// A cached list is reused unless `force_refresh` is set or it was computed with
    /// different custom keywords. Cache failures never fail the call.
    #[instrument(
        skip(self, request, now),
        fields(
            event_id = request.event_id,
            force_refresh = request.force_refresh,
            run_id = run_id::get()
        )
    )]
    pub fn compute_candidates_at(
        &self,
        request: &CandidateRequest,
        now: DateTime<Utc>,
    ) -> Result<CandidateResults, MatchingError> {
        let custom_keywords = request.normalized_custom_keywords();

        if !request.force_refresh {
            if let Some(entry) = self.cached_entry(request.event_id, custom_keywords.as_deref()) {
                debug!(
                    computation_id = %entry.computation_id,
                    computed_at = %entry.computed_at,
                    "serving cached candidates"
                );
                return Ok(ResultAssembler {
                    event_id: entry.event_id,
                    keyword_set: &entry.keyword_snapshot,
                    scored: &entry.candidates,
                    prefilter_report: &entry.prefilter_report,
                    computation_id: &entry.computation_id,
                    computed_at: entry.computed_at,
                }
                .assemble(request.min_score, request.limit, true));
            }
        }

        let event = self
            .events
            .get_event(request.event_id)?
            .ok_or(MatchingError::EventNotFound(request.event_id))?;
        let computation = self.compute(&event, custom_keywords.as_deref(), now)?;

        let computation_id = run_id::computation_id();
        let results = ResultAssembler {
            event_id: event.id,
            keyword_set: &computation.keyword_set,
            scored: &computation.scored,
            prefilter_report: &computation.prefilter_report,
            computation_id: &computation_id,
            computed_at: now,
        }
        .assemble(request.min_score, request.limit, false);

        info!(
            %computation_id,
            keywords = computation.keyword_set.len(),
            volunteers = computation.prefilter_report.total_volunteers,
            governance_excluded = computation.prefilter_report.governance_excluded.len(),
            scored = results.scored_total,
            returned = results.candidates.len(),
            "computed candidates"
        );

        let entry = CacheEntry {
            event_id: event.id,
            custom_keywords,
            keyword_snapshot: computation.keyword_set,
            candidates: computation.scored,
            prefilter_report: computation.prefilter_report,
            computation_id,
            computed_at: now,
        };
        if let Err(err) = self.cache.put(entry) {
            warn!(error = %err, "failed to cache candidates");
        }

        Ok(results)
    }

    /// Drops the cached list for `event_id`; the next request recomputes.
    pub fn invalidate(&self, event_id: i64) -> Result<(), CacheError> {
        self.cache.invalidate(event_id)
    }

    fn cached_entry(
        &self,
        event_id: i64,
        custom_keywords: Option<&[String]>,
    ) -> Option<Arc<CacheEntry>> {
        match self.cache.get(event_id) {
            Ok(Some(entry)) if entry.matches_custom_keywords(custom_keywords) => Some(entry),
            Ok(Some(_)) => {
                debug!("cached candidates used different custom keywords; recomputing");
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "candidate cache lookup failed; recomputing");
                None
            }
        }
    }

    fn compute(
        &self,
        event: &Event,
        custom_keywords: Option<&[String]>,
        now: DateTime<Utc>,
    ) -> Result<Computation, MatchingError> {
        let custom_raw = custom_keywords.map(|keywords| keywords.join(","));
        let keyword_set = derive_keywords(event, custom_raw.as_deref());

        let volunteers = self.volunteers.list_volunteers(&self.volunteer_filter)?;
        let outcome = self.prefilter.filter(volunteers, &keyword_set);
        let mut pool = outcome.pool;
        self.attach_participation(&mut pool)?;

        let scored = pool
            .iter()
            .map(|volunteer| self.scoring.score_candidate(event, volunteer, &keyword_set, now))
            .collect();

        Ok(Computation {
            keyword_set,
            scored,
            prefilter_report: outcome.report,
        })
    }

    fn attach_participation(&self, pool: &mut [Volunteer]) -> Result<(), StoreError> {
        let Some(store) = &self.participation else {
            return Ok(());
        };
        if pool.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = pool.iter().map(|v| v.id).collect();
        let mut histories = store.history_for(&ids)?;
        for volunteer in pool.iter_mut() {
            histories
                .remove(&volunteer.id)
                .unwrap_or_default()
                .apply_to(volunteer);
        }
        Ok(())
    }
}
