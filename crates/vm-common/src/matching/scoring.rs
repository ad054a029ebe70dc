use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::{
    keywords::KeywordSet,
    profile::{ProfileMatch, VolunteerProfile},
    weights::{
        DEFAULT_WEIGHTS, FREQUENCY_HIGH_MIN, FREQUENCY_LOW_MIN, FREQUENCY_MEDIUM_MIN,
        MODERATE_ACTIVITY_DAYS, RECENT_ACTIVITY_DAYS, SCORE_GRID, ScoreWeights,
    },
};
use crate::{Event, EventType, LocalStatus, Volunteer};

/// Scoring components, in the order they appear in a breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScoreComponentKind {
    PastEventType,
    TitleIndustryMatch,
    SkillOverlap,
    ConnectorProfile,
    Recency,
    Locality,
    Frequency,
}

impl ScoreComponentKind {
    pub fn label(self) -> &'static str {
        match self {
            ScoreComponentKind::PastEventType => "Past event-type participation",
            ScoreComponentKind::TitleIndustryMatch => "Title/industry keyword match",
            ScoreComponentKind::SkillOverlap => "Skill overlap",
            ScoreComponentKind::ConnectorProfile => "Connector profile",
            ScoreComponentKind::Recency => "Recency",
            ScoreComponentKind::Locality => "Geographic locality",
            ScoreComponentKind::Frequency => "Participation frequency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub component: ScoreComponentKind,
    pub weight: f64,
    pub explanation: String,
}

impl ScoreComponent {
    fn new(component: ScoreComponentKind, weight: f64, evidence: impl AsRef<str>) -> Self {
        Self {
            component,
            weight,
            explanation: format!("{} +{:.2}: {}", component.label(), weight, evidence.as_ref()),
        }
    }
}

/// A scored volunteer for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub volunteer_id: i64,
    pub total_score: f64,
    pub score_breakdown: Vec<ScoreComponent>,
    pub matched_keywords: Vec<String>,
}

impl Candidate {
    /// Builds a candidate whose total is the breakdown weights summed in order, rounded
    /// to [`SCORE_GRID`]; breakdowns with equal sums have bit-identical totals.
    pub fn from_breakdown(
        volunteer_id: i64,
        score_breakdown: Vec<ScoreComponent>,
        matched_keywords: Vec<String>,
    ) -> Self {
        let sum = score_breakdown.iter().fold(0.0, |acc, c| acc + c.weight);
        let total_score = (sum * SCORE_GRID).round() / SCORE_GRID;
        Self {
            volunteer_id,
            total_score,
            score_breakdown,
            matched_keywords,
        }
    }

    /// Explanations joined with `"; "`, for flat exports.
    pub fn explanation_text(&self) -> String {
        self.score_breakdown
            .iter()
            .map(|c| c.explanation.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
}

impl ScoringConfig {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }
}

/// Scores one volunteer with the default weights.
pub fn score_volunteer(
    event: &Event,
    volunteer: &Volunteer,
    keywords: &KeywordSet,
    as_of: DateTime<Utc>,
) -> Candidate {
    ScoringEngine::new(ScoringConfig::default()).score_candidate(event, volunteer, keywords, as_of)
}

pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scores one volunteer. Components are independent and additive and appear in the
    /// breakdown in fixed order; absent components are left out.
    pub fn score_candidate(
        &self,
        event: &Event,
        volunteer: &Volunteer,
        keywords: &KeywordSet,
        as_of: DateTime<Utc>,
    ) -> Candidate {
        let tokens = keywords.matching_tokens();
        let profile_match = VolunteerProfile::new(volunteer).match_tokens(&tokens);

        let breakdown: Vec<ScoreComponent> = [
            self.score_past_event_type(event.event_type, volunteer),
            self.score_title_industry(&profile_match),
            self.score_skills(&profile_match),
            self.score_connector(volunteer),
            self.score_recency(volunteer, as_of),
            self.score_locality(volunteer),
            self.score_frequency(volunteer),
        ]
        .into_iter()
        .flatten()
        .collect();

        let matched_keywords = profile_match.matched_keywords(tokens.iter().copied());
        Candidate::from_breakdown(volunteer.id, breakdown, matched_keywords)
    }

    fn score_past_event_type(
        &self,
        event_type: EventType,
        volunteer: &Volunteer,
    ) -> Option<ScoreComponent> {
        let count = volunteer
            .participation_history
            .iter()
            .filter(|record| record.event_type == event_type)
            .count();
        if count == 0 {
            return None;
        }

        // Flat weight: history depth is reported but does not scale the score.
        Some(ScoreComponent::new(
            ScoreComponentKind::PastEventType,
            self.config.weights.past_event_type,
            format!(
                "{} past {} event{}",
                count,
                event_type.label(),
                if count == 1 { "" } else { "s" }
            ),
        ))
    }

    fn score_title_industry(&self, profile_match: &ProfileMatch) -> Option<ScoreComponent> {
        if profile_match.field_matches.is_empty() {
            return None;
        }
        Some(ScoreComponent::new(
            ScoreComponentKind::TitleIndustryMatch,
            self.config.weights.title_industry,
            format!("matched {}", profile_match.field_matches.join(", ")),
        ))
    }

    fn score_skills(&self, profile_match: &ProfileMatch) -> Option<ScoreComponent> {
        if profile_match.skill_matches.is_empty() {
            return None;
        }
        Some(ScoreComponent::new(
            ScoreComponentKind::SkillOverlap,
            self.config.weights.skill_overlap,
            format!("matched {}", profile_match.skill_matches.join(", ")),
        ))
    }

    fn score_connector(&self, volunteer: &Volunteer) -> Option<ScoreComponent> {
        volunteer.has_connector_profile.then(|| {
            ScoreComponent::new(
                ScoreComponentKind::ConnectorProfile,
                self.config.weights.connector_profile,
                "has connector profile",
            )
        })
    }

    fn score_recency(&self, volunteer: &Volunteer, as_of: DateTime<Utc>) -> Option<ScoreComponent> {
        let last = volunteer.last_activity_date?;
        // Future-dated activity counts as today.
        let days = (as_of - last).num_days().max(0);

        let weight = if days <= RECENT_ACTIVITY_DAYS {
            self.config.weights.recency_recent
        } else if days <= MODERATE_ACTIVITY_DAYS {
            self.config.weights.recency_moderate
        } else {
            return None;
        };

        Some(ScoreComponent::new(
            ScoreComponentKind::Recency,
            weight,
            format!("last active {} days ago", days),
        ))
    }

    fn score_locality(&self, volunteer: &Volunteer) -> Option<ScoreComponent> {
        let weight = match volunteer.local_status {
            LocalStatus::Local => self.config.weights.locality_local,
            LocalStatus::Partial => self.config.weights.locality_partial,
            LocalStatus::NonLocal | LocalStatus::Unknown => return None,
        };
        Some(ScoreComponent::new(
            ScoreComponentKind::Locality,
            weight,
            format!("local status {}", volunteer.local_status),
        ))
    }

    fn score_frequency(&self, volunteer: &Volunteer) -> Option<ScoreComponent> {
        let count = volunteer.activity_count;
        let weight = if count >= FREQUENCY_HIGH_MIN {
            self.config.weights.frequency_high
        } else if count >= FREQUENCY_MEDIUM_MIN {
            self.config.weights.frequency_medium
        } else if count >= FREQUENCY_LOW_MIN {
            self.config.weights.frequency_low
        } else {
            return None;
        };
        Some(ScoreComponent::new(
            ScoreComponentKind::Frequency,
            weight,
            format!("{} past activities", count),
        ))
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::new(DEFAULT_WEIGHTS))
    }
}
