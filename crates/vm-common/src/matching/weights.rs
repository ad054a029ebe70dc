/// Component weights for candidate scoring.
///
/// Tiered components (recency, locality, frequency) contribute their single highest
/// applicable tier only.
pub const DEFAULT_WEIGHTS: ScoreWeights = ScoreWeights {
    past_event_type: 1.0,
    title_industry: 0.6,
    skill_overlap: 0.8,
    connector_profile: 0.4,
    recency_recent: 0.35,
    recency_moderate: 0.15,
    locality_local: 0.2,
    locality_partial: 0.1,
    frequency_high: 0.3,
    frequency_medium: 0.2,
    frequency_low: 0.1,
};

/// Last activity within this many days counts as recent.
pub const RECENT_ACTIVITY_DAYS: i64 = 90;
/// Last activity within this many days still earns partial recency credit.
pub const MODERATE_ACTIVITY_DAYS: i64 = 180;

pub const FREQUENCY_HIGH_MIN: u32 = 10;
pub const FREQUENCY_MEDIUM_MIN: u32 = 5;
pub const FREQUENCY_LOW_MIN: u32 = 2;

/// Candidate totals are snapped to hundredths so equal sums compare equal.
pub const SCORE_GRID: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub past_event_type: f64,
    pub title_industry: f64,
    pub skill_overlap: f64,
    pub connector_profile: f64,
    pub recency_recent: f64,
    pub recency_moderate: f64,
    pub locality_local: f64,
    pub locality_partial: f64,
    pub frequency_high: f64,
    pub frequency_medium: f64,
    pub frequency_low: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}
