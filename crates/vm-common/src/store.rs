//! Record stores the engine reads from.
//!
//! The engine only sees these traits; the in-memory implementations back the CLI and the
//! tests and can be built from a JSON [`Snapshot`].

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::{Event, EventType, ParticipationRecord, Volunteer, matching::prefilter::governance_check};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Optional pushdown hint for volunteer listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolunteerFilter {
    /// Skip volunteers failing the governance flags. The engine sets this only when
    /// its governance audit is disabled.
    pub contactable_only: bool,
}

impl VolunteerFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contactable() -> Self {
        Self {
            contactable_only: true,
        }
    }
}

pub trait EventStore: Send + Sync {
    fn get_event(&self, event_id: i64) -> Result<Option<Event>, StoreError>;
}

pub trait VolunteerStore: Send + Sync {
    /// Volunteers with governance flags populated. History fields may be pre-joined.
    fn list_volunteers(&self, filter: &VolunteerFilter) -> Result<Vec<Volunteer>, StoreError>;
}

/// Participation history for one volunteer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipationSummary {
    pub history: Vec<ParticipationRecord>,
    pub activity_count: u32,
    pub last_activity_date: Option<DateTime<Utc>>,
}

impl ParticipationSummary {
    /// Replaces the volunteer's pre-joined history fields.
    pub fn apply_to(self, volunteer: &mut Volunteer) {
        volunteer.participation_history = self.history;
        volunteer.activity_count = self.activity_count;
        volunteer.last_activity_date = self.last_activity_date;
    }
}

pub trait ParticipationStore: Send + Sync {
    /// Histories for the given volunteers. Volunteers without history may be absent.
    fn history_for(
        &self,
        volunteer_ids: &[i64],
    ) -> Result<HashMap<i64, ParticipationSummary>, StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: HashMap<i64, Event>,
}

impl InMemoryEventStore {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().map(|e| (e.id, e)).collect(),
        }
    }
}

impl EventStore for InMemoryEventStore {
    fn get_event(&self, event_id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.events.get(&event_id).cloned())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryVolunteerStore {
    volunteers: Vec<Volunteer>,
}

impl InMemoryVolunteerStore {
    pub fn new(volunteers: Vec<Volunteer>) -> Self {
        Self { volunteers }
    }
}

impl VolunteerStore for InMemoryVolunteerStore {
    fn list_volunteers(&self, filter: &VolunteerFilter) -> Result<Vec<Volunteer>, StoreError> {
        Ok(self
            .volunteers
            .iter()
            .filter(|v| !filter.contactable_only || governance_check(v).is_none())
            .cloned()
            .collect())
    }
}

/// One completed participation row as exported from the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationRow {
    pub volunteer_id: i64,
    pub event_type: EventType,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryParticipationStore {
    by_volunteer: HashMap<i64, ParticipationSummary>,
}

impl InMemoryParticipationStore {
    /// Groups rows per volunteer; history is ordered oldest first.
    pub fn from_rows(rows: impl IntoIterator<Item = ParticipationRow>) -> Self {
        let mut by_volunteer: HashMap<i64, ParticipationSummary> = HashMap::new();
        for row in rows {
            by_volunteer
                .entry(row.volunteer_id)
                .or_default()
                .history
                .push(ParticipationRecord {
                    event_type: row.event_type,
                    date: row.date,
                });
        }
        for summary in by_volunteer.values_mut() {
            summary.history.sort_by_key(|r| r.date);
            summary.activity_count = summary.history.len() as u32;
            summary.last_activity_date = summary.history.last().map(|r| r.date);
        }
        Self { by_volunteer }
    }
}

impl ParticipationStore for InMemoryParticipationStore {
    fn history_for(
        &self,
        volunteer_ids: &[i64],
    ) -> Result<HashMap<i64, ParticipationSummary>, StoreError> {
        Ok(volunteer_ids
            .iter()
            .filter_map(|id| self.by_volunteer.get(id).map(|s| (*id, s.clone())))
            .collect())
    }
}

/// JSON export of the record stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub volunteers: Vec<Volunteer>,
    /// Separate history rows; when empty, volunteers' pre-joined history is used.
    #[serde(default)]
    pub participation: Vec<ParticipationRow>,
}

impl Snapshot {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn into_stores(
        self,
    ) -> (
        InMemoryEventStore,
        InMemoryVolunteerStore,
        Option<InMemoryParticipationStore>,
    ) {
        let participation = (!self.participation.is_empty())
            .then(|| InMemoryParticipationStore::from_rows(self.participation));
        (
            InMemoryEventStore::new(self.events),
            InMemoryVolunteerStore::new(self.volunteers),
            participation,
        )
    }
}
