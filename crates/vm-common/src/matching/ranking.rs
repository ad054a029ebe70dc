use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{keywords::KeywordSet, prefilter::PrefilterReport, scoring::Candidate};

/// Slack for the inclusive `min_score` bound, so sums like `0.6 + 0.9` still pass `1.5`.
const MIN_SCORE_TOLERANCE: f64 = 1e-9;

/// Score descending, then volunteer id ascending.
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    match b.total_score.total_cmp(&a.total_score) {
        Ordering::Equal => a.volunteer_id.cmp(&b.volunteer_id),
        other => other,
    }
}

/// Sorts, applies `min_score` (inclusive), then truncates to `limit`.
pub fn rank_candidates(
    mut candidates: Vec<Candidate>,
    min_score: Option<f64>,
    limit: Option<usize>,
) -> Vec<Candidate> {
    candidates.sort_by(compare_candidates);

    if let Some(min_score) = min_score {
        candidates.retain(|c| c.total_score + MIN_SCORE_TOLERANCE >= min_score);
    }
    if let Some(limit) = limit {
        candidates.truncate(limit);
    }
    candidates
}

/// Plain-language description of how the list was produced, for display next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub steps: Vec<String>,
}

impl StrategySummary {
    pub fn describe(keywords: &KeywordSet, report: &PrefilterReport, returned: usize) -> Self {
        let sources = keywords
            .sources()
            .iter()
            .map(|s| s.as_ref().replace('_', " "))
            .collect::<Vec<_>>()
            .join(", ");

        let derive = format!(
            "Derive keywords: {} keywords from {} ({}).",
            keywords.matching_tokens().len(),
            if keywords.used_fallback() {
                "fallback rules"
            } else {
                "event signals"
            },
            sources
        );

        let keyword_step = if report.keyword_filter_applied {
            format!("{} had no keyword match", report.keyword_filtered)
        } else {
            "keyword filter skipped for generic keywords".to_string()
        };
        let prefilter = format!(
            "Prefilter volunteers: {} total, {} excluded by contact/report preferences or inactivity, {}, {} over the pool cap; {} kept.",
            report.total_volunteers,
            report.governance_excluded.len(),
            keyword_step,
            report.capped,
            report.retained
        );

        let rank = format!(
            "Score and rank: past event type, title/industry and skill matches, connector profile, recency, locality and frequency; returning {} candidates.",
            returned
        );

        Self {
            steps: vec![derive, prefilter, rank],
        }
    }
}

/// What callers receive from a candidate computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResults {
    pub event_id: i64,
    pub keyword_set: KeywordSet,
    pub strategy_summary: StrategySummary,
    pub candidates: Vec<Candidate>,
    pub prefilter_report: PrefilterReport,
    /// Number of scored candidates before `min_score`/`limit`.
    pub scored_total: usize,
    pub computation_id: String,
    pub computed_at: DateTime<Utc>,
    pub from_cache: bool,
}

pub struct ResultAssembler<'a> {
    pub event_id: i64,
    pub keyword_set: &'a KeywordSet,
    pub scored: &'a [Candidate],
    pub prefilter_report: &'a PrefilterReport,
    pub computation_id: &'a str,
    pub computed_at: DateTime<Utc>,
}

impl ResultAssembler<'_> {
    pub fn assemble(
        self,
        min_score: Option<f64>,
        limit: Option<usize>,
        from_cache: bool,
    ) -> CandidateResults {
        let candidates = rank_candidates(self.scored.to_vec(), min_score, limit);
        let strategy_summary =
            StrategySummary::describe(self.keyword_set, self.prefilter_report, candidates.len());

        CandidateResults {
            event_id: self.event_id,
            keyword_set: self.keyword_set.clone(),
            strategy_summary,
            candidates,
            prefilter_report: self.prefilter_report.clone(),
            scored_total: self.scored.len(),
            computation_id: self.computation_id.to_string(),
            computed_at: self.computed_at,
            from_cache,
        }
    }
}
