use crate::{Volunteer, normalize::MatchText};

/// Keyword hits on one volunteer's descriptive fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileMatch {
    /// Tokens found in title, department or industry.
    pub field_matches: Vec<String>,
    /// Tokens found in at least one skill entry.
    pub skill_matches: Vec<String>,
}

impl ProfileMatch {
    pub fn is_empty(&self) -> bool {
        self.field_matches.is_empty() && self.skill_matches.is_empty()
    }

    /// Number of distinct tokens hit anywhere.
    pub fn distinct_hits(&self) -> usize {
        let all = self
            .field_matches
            .iter()
            .chain(&self.skill_matches)
            .map(String::as_str);
        self.matched_keywords(all).len()
    }

    /// Hit tokens in the order of `tokens`, each once.
    pub fn matched_keywords<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut matched: Vec<String> = Vec::new();
        for token in tokens {
            let hit = self.field_matches.iter().any(|m| m == token)
                || self.skill_matches.iter().any(|m| m == token);
            if hit && !matched.iter().any(|m| m == token) {
                matched.push(token.to_string());
            }
        }
        matched
    }
}

/// Normalized view of the volunteer fields keywords are matched against.
pub struct VolunteerProfile {
    fields: Vec<MatchText>,
    skills: Vec<MatchText>,
}

impl VolunteerProfile {
    pub fn new(volunteer: &Volunteer) -> Self {
        let fields = [
            volunteer.title.as_deref(),
            volunteer.department.as_deref(),
            volunteer.industry.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(MatchText::new)
        .filter(|text| !text.is_empty())
        .collect();

        let skills = volunteer
            .skills
            .iter()
            .map(|skill| MatchText::new(skill))
            .filter(|text| !text.is_empty())
            .collect();

        Self { fields, skills }
    }

    pub fn field_contains(&self, token: &str) -> bool {
        self.fields.iter().any(|f| f.contains_keyword(token))
    }

    pub fn skills_contain(&self, token: &str) -> bool {
        self.skills.iter().any(|s| s.contains_keyword(token))
    }

    pub fn match_tokens(&self, tokens: &[&str]) -> ProfileMatch {
        let field_matches = tokens
            .iter()
            .filter(|t| self.field_contains(t))
            .map(|t| t.to_string())
            .collect();
        let skill_matches = tokens
            .iter()
            .filter(|t| self.skills_contain(t))
            .map(|t| t.to_string())
            .collect();

        ProfileMatch {
            field_matches,
            skill_matches,
        }
    }
}
