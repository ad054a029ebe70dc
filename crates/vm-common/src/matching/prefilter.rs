use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::{keywords::KeywordSet, profile::VolunteerProfile};
use crate::Volunteer;

pub const DEFAULT_MAX_CANDIDATES: usize = 2000;

#[derive(Debug, Clone)]
pub struct PrefilterConfig {
    /// Upper bound on volunteers handed to scoring.
    pub max_candidates: usize,
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl PrefilterConfig {
    /// Reads `VM_PREFILTER_MAX_CANDIDATES`; missing, zero or unparsable values keep the
    /// default.
    pub fn from_env() -> Self {
        Self {
            max_candidates: std::env::var("VM_PREFILTER_MAX_CANDIDATES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_CANDIDATES),
        }
    }
}

/// Why a volunteer was removed before scoring. Checked in declaration order; the first
/// failing flag is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GovernanceReason {
    Inactive,
    DoNotContact,
    EmailOptOut,
    ExcludedFromReports,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceExclusion {
    pub volunteer_id: i64,
    pub reason: GovernanceReason,
}

/// Audit trail of what the prefilter removed and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefilterReport {
    pub total_volunteers: usize,
    /// Removed by governance flags, regardless of keywords.
    pub governance_excluded: Vec<GovernanceExclusion>,
    pub keyword_filter_applied: bool,
    /// Eligible volunteers with no keyword hit on any field.
    pub keyword_filtered: usize,
    /// Dropped by the `max_candidates` cap.
    pub capped: usize,
    /// Handed on to scoring.
    pub retained: usize,
}

impl PrefilterReport {
    pub fn was_governance_excluded(&self, volunteer_id: i64) -> Option<GovernanceReason> {
        self.governance_excluded
            .iter()
            .find(|e| e.volunteer_id == volunteer_id)
            .map(|e| e.reason)
    }
}

#[derive(Debug, Clone)]
pub struct PrefilterOutcome {
    pub pool: Vec<Volunteer>,
    pub report: PrefilterReport,
}

/// Governance flag check; `None` means the volunteer may be contacted.
pub fn governance_check(volunteer: &Volunteer) -> Option<GovernanceReason> {
    if !volunteer.is_active {
        Some(GovernanceReason::Inactive)
    } else if volunteer.do_not_contact {
        Some(GovernanceReason::DoNotContact)
    } else if volunteer.email_opt_out {
        Some(GovernanceReason::EmailOptOut)
    } else if volunteer.exclude_from_reports {
        Some(GovernanceReason::ExcludedFromReports)
    } else {
        None
    }
}

pub struct CandidatePrefilter {
    config: PrefilterConfig,
}

impl CandidatePrefilter {
    pub fn new(config: PrefilterConfig) -> Self {
        Self { config }
    }

    /// Reduces the population to a scoring pool.
    ///
    /// Governance exclusion always runs. The keyword containment test only runs when the
    /// set carries real signal (anything beyond the universal fallback). The pool comes
    /// back ordered by volunteer id.
    pub fn filter(&self, volunteers: Vec<Volunteer>, keywords: &KeywordSet) -> PrefilterOutcome {
        let mut report = PrefilterReport {
            total_volunteers: volunteers.len(),
            keyword_filter_applied: !keywords.is_universal_only(),
            ..PrefilterReport::default()
        };
        let tokens = keywords.matching_tokens();

        let mut survivors: Vec<(usize, Volunteer)> = Vec::new();
        for volunteer in volunteers {
            if let Some(reason) = governance_check(&volunteer) {
                report.governance_excluded.push(GovernanceExclusion {
                    volunteer_id: volunteer.id,
                    reason,
                });
                continue;
            }

            if !report.keyword_filter_applied {
                survivors.push((0, volunteer));
                continue;
            }

            let hits = VolunteerProfile::new(&volunteer)
                .match_tokens(&tokens)
                .distinct_hits();
            if hits == 0 {
                report.keyword_filtered += 1;
                continue;
            }
            survivors.push((hits, volunteer));
        }

        if survivors.len() > self.config.max_candidates {
            survivors.sort_by(|(a_hits, a), (b_hits, b)| match b_hits.cmp(a_hits) {
                Ordering::Equal => a.id.cmp(&b.id),
                other => other,
            });
            report.capped = survivors.len() - self.config.max_candidates;
            survivors.truncate(self.config.max_candidates);
        }

        let mut pool: Vec<Volunteer> = survivors.into_iter().map(|(_, v)| v).collect();
        pool.sort_by_key(|v| v.id);
        report.retained = pool.len();

        PrefilterOutcome { pool, report }
    }
}

impl Default for CandidatePrefilter {
    fn default() -> Self {
        Self::new(PrefilterConfig::default())
    }
}
