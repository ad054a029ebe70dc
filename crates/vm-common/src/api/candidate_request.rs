use serde::{Deserialize, Serialize};

use crate::normalize::split_custom_keywords;

/// Input to a candidate computation.
///
/// `min_score` and `limit` only shape the returned list; they never change what is
/// computed or cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRequest {
    pub event_id: i64,
    /// Comma separated keywords that replace the ones stored on the event.
    #[serde(default)]
    pub custom_keywords: Option<String>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub force_refresh: bool,
}

impl CandidateRequest {
    pub fn new(event_id: i64) -> Self {
        Self {
            event_id,
            ..Self::default()
        }
    }

    pub fn with_custom_keywords(mut self, raw: impl Into<String>) -> Self {
        self.custom_keywords = Some(raw.into());
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    /// Sanitized request keywords. Blank or separator-only input counts as absent.
    pub fn normalized_custom_keywords(&self) -> Option<Vec<String>> {
        self.custom_keywords
            .as_deref()
            .map(split_custom_keywords)
            .filter(|keywords| !keywords.is_empty())
    }
}
