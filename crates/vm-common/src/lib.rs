pub mod api;
pub mod cache;
pub mod event_type;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod run_id;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

pub use event_type::EventType;

// Commonly used data models for matching functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub format: Option<EventFormat>,
    /// Free-form comma separated keywords saved on the event record.
    #[serde(default)]
    pub custom_keywords: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventFormat {
    Virtual,
    InPerson,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocalStatus {
    Local,
    Partial,
    NonLocal,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub event_type: EventType,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub local_status: LocalStatus,
    #[serde(default)]
    pub has_connector_profile: bool,
    /// Completed past events, oldest first.
    #[serde(default)]
    pub participation_history: Vec<ParticipationRecord>,
    #[serde(default)]
    pub activity_count: u32,
    #[serde(default)]
    pub last_activity_date: Option<DateTime<Utc>>,

    // governance flags
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub do_not_contact: bool,
    #[serde(default)]
    pub email_opt_out: bool,
    #[serde(default)]
    pub exclude_from_reports: bool,
}

impl Default for Volunteer {
    fn default() -> Self {
        Self {
            id: 0,
            title: None,
            department: None,
            industry: None,
            skills: Vec::new(),
            local_status: LocalStatus::Unknown,
            has_connector_profile: false,
            participation_history: Vec::new(),
            activity_count: 0,
            last_activity_date: None,
            is_active: true,
            do_not_contact: false,
            email_opt_out: false,
            exclude_from_reports: false,
        }
    }
}

const fn default_true() -> bool {
    true
}
