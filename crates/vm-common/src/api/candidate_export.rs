use serde::{Deserialize, Serialize};

use crate::matching::{ranking::CandidateResults, scoring::Candidate};

/// One flat row per ranked candidate, for CSV or table output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateExportRow {
    /// 1-based position in the ranked list.
    pub rank: usize,
    pub volunteer_id: i64,
    pub total_score: f64,
    pub matched_keywords: String,
    pub score_breakdown: String,
}

impl CandidateExportRow {
    pub fn from_candidate(rank: usize, candidate: &Candidate) -> Self {
        Self {
            rank,
            volunteer_id: candidate.volunteer_id,
            total_score: candidate.total_score,
            matched_keywords: candidate.matched_keywords.join(", "),
            score_breakdown: candidate.explanation_text(),
        }
    }
}

impl CandidateResults {
    pub fn export_rows(&self) -> Vec<CandidateExportRow> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(i, c)| CandidateExportRow::from_candidate(i + 1, c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::{
        Event, EventType, LocalStatus, ParticipationRecord, Volunteer,
        matching::{keywords::derive_keywords, scoring::score_volunteer},
    };

    #[test]
    fn row_joins_breakdown_explanations() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let event = Event {
            id: 1,
            event_type: EventType::CareerFair,
            title: "Fall Career Fair".into(),
            ..Event::default()
        };
        let volunteer = Volunteer {
            id: 42,
            title: Some("Career Counselor".into()),
            local_status: LocalStatus::Local,
            participation_history: vec![ParticipationRecord {
                event_type: EventType::CareerFair,
                date: Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap(),
            }],
            ..Volunteer::default()
        };
        let candidate = score_volunteer(&event, &volunteer, &derive_keywords(&event, None), as_of);

        let row = CandidateExportRow::from_candidate(1, &candidate);
        assert_eq!(row.rank, 1);
        assert_eq!(row.volunteer_id, 42);
        assert_eq!(row.matched_keywords, "career");
        assert_eq!(row.score_breakdown.split("; ").count(), 3);
        assert_eq!(row.score_breakdown, candidate.explanation_text());
    }
}
