use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Category of a volunteer-facing event.
///
/// Values the event store does not know about deserialize to [`EventType::Other`],
/// which carries no curated keywords.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    CareerFair,
    CareerSpeaker,
    CareerJumping,
    EmployabilitySkills,
    DataViz,
    Mentoring,
    VirtualSession,
    ConnectorSession,
    Ignite,
    ClientConnectedProject,
    WorkplaceVisit,
    CampusVisit,
    CollegeOptions,
    ClassroomSpeaker,
    FinancialLiteracy,
    MathRelays,
    Internship,
    HealthCareers,
    #[default]
    #[serde(other)]
    Other,
}

impl EventType {
    /// Curated keyword list for the event type.
    ///
    /// `VirtualSession` and `Other` carry no keywords; those events match on title and
    /// description alone.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            EventType::CareerFair => &[
                "career",
                "job search",
                "networking",
                "resume",
                "interview",
                "employment",
                "hiring",
                "recruiting",
            ],
            EventType::CareerSpeaker => &[
                "career",
                "professional development",
                "industry expertise",
                "public speaking",
                "mentorship",
                "career pathways",
            ],
            EventType::CareerJumping => &[
                "career exploration",
                "career change",
                "job shadowing",
                "industry insight",
                "professional growth",
            ],
            EventType::EmployabilitySkills => &[
                "employability",
                "soft skills",
                "communication",
                "teamwork",
                "resume",
                "interview",
                "professionalism",
            ],
            EventType::DataViz => &[
                "data visualization",
                "data",
                "analytics",
                "charts",
                "dashboard",
                "statistics",
                "excel",
                "tableau",
            ],
            EventType::Mentoring => &[
                "mentoring",
                "mentor",
                "coaching",
                "guidance",
                "youth development",
                "leadership",
            ],
            EventType::VirtualSession => &[],
            EventType::ConnectorSession => &[
                "connector",
                "networking",
                "relationship building",
                "community outreach",
            ],
            EventType::Ignite => &[
                "presentation",
                "public speaking",
                "storytelling",
                "inspiration",
                "leadership",
            ],
            EventType::ClientConnectedProject => &[
                "project management",
                "consulting",
                "client relations",
                "problem solving",
                "business",
            ],
            EventType::WorkplaceVisit => &[
                "workplace",
                "site visit",
                "industry tour",
                "operations",
                "facilities",
            ],
            EventType::CampusVisit => &[
                "college",
                "higher education",
                "admissions",
                "campus tour",
                "student life",
            ],
            EventType::CollegeOptions => &[
                "college",
                "higher education",
                "admissions",
                "financial aid",
                "post-secondary planning",
            ],
            EventType::ClassroomSpeaker => &[
                "education",
                "teaching",
                "classroom",
                "public speaking",
                "student engagement",
            ],
            EventType::FinancialLiteracy => &[
                "finance",
                "budgeting",
                "banking",
                "accounting",
                "personal finance",
                "investing",
            ],
            EventType::MathRelays => &[
                "math",
                "mathematics",
                "stem",
                "problem solving",
                "engineering",
                "statistics",
            ],
            EventType::Internship => &[
                "internship",
                "work experience",
                "supervision",
                "professional development",
                "hiring",
            ],
            EventType::HealthCareers => &[
                "healthcare",
                "medical",
                "nursing",
                "health sciences",
                "clinical",
                "patient care",
            ],
            EventType::Other => &[],
        }
    }

    /// Human readable words of the type name, e.g. `career fair`.
    pub fn label(self) -> String {
        self.as_ref().replace('_', " ")
    }
}
