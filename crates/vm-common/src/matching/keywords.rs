use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::dictionaries::{
    AUDIENCE_LEVELS, CONTENT_TYPES, GENERIC_TITLE_WORDS, IN_PERSON_FORMAT_KEYWORDS,
    LOCATION_CONTEXTS, LONG_TITLE_KEYWORD, LONG_TITLE_WORDS, MIN_FALLBACK_WORD_LEN,
    PROFESSIONAL_DOMAINS, SEMANTIC_TONES, SENIORITY_LEVELS, STOP_WORDS, TITLE_PATTERNS,
    TOOLS_AND_TECHNOLOGIES, UNIVERSAL_FALLBACK, VIRTUAL_FORMAT_KEYWORDS,
};
use crate::{
    Event, EventFormat, EventType,
    normalize::{MatchText, normalize_text, split_custom_keywords, tokenize},
};

/// Provenance of a derived keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum KeywordSource {
    Custom,
    EventType,
    TextAnalysis,
    Format,
    Pattern,
    Semantic,
    Location,
    FallbackText,
    FallbackContextual,
    FallbackUniversal,
}

impl KeywordSource {
    pub fn is_fallback(self) -> bool {
        matches!(
            self,
            KeywordSource::FallbackText
                | KeywordSource::FallbackContextual
                | KeywordSource::FallbackUniversal
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedKeyword {
    pub keyword: String,
    pub source: KeywordSource,
}

/// Ordered, source-tagged keywords for one event.
///
/// The same keyword may appear under several sources so the caller can show where it
/// came from; for matching it counts once (see [`KeywordSet::matching_tokens`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet {
    keywords: Vec<TaggedKeyword>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes and appends a keyword. Returns `false` for empty input or an exact
    /// `(keyword, source)` duplicate.
    pub fn push(&mut self, keyword: &str, source: KeywordSource) -> bool {
        let keyword = normalize_text(keyword);
        if keyword.is_empty()
            || self
                .keywords
                .iter()
                .any(|k| k.source == source && k.keyword == keyword)
        {
            return false;
        }
        self.keywords.push(TaggedKeyword { keyword, source });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaggedKeyword> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Distinct keywords in first-seen order.
    pub fn matching_tokens(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.keywords
            .iter()
            .map(|k| k.keyword.as_str())
            .filter(|k| seen.insert(*k))
            .collect()
    }

    /// Distinct sources in first-seen order.
    pub fn sources(&self) -> Vec<KeywordSource> {
        let mut sources = Vec::new();
        for tagged in &self.keywords {
            if !sources.contains(&tagged.source) {
                sources.push(tagged.source);
            }
        }
        sources
    }

    pub fn by_source(&self, source: KeywordSource) -> impl Iterator<Item = &str> {
        self.keywords
            .iter()
            .filter(move |k| k.source == source)
            .map(|k| k.keyword.as_str())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.keyword == keyword)
    }

    /// `true` when only the universal floor was produced; such a set carries no signal
    /// worth prefiltering on.
    pub fn is_universal_only(&self) -> bool {
        !self.keywords.is_empty()
            && self
                .keywords
                .iter()
                .all(|k| k.source == KeywordSource::FallbackUniversal)
    }

    pub fn used_fallback(&self) -> bool {
        self.keywords.iter().any(|k| k.source.is_fallback())
    }
}

struct EventText {
    title: MatchText,
    full: MatchText,
}

impl EventText {
    fn new(event: &Event) -> Self {
        Self {
            title: MatchText::new(&event.title),
            full: MatchText::new(&format!("{} {}", event.title, event.description)),
        }
    }
}

/// Derives the keyword set for an event.
///
/// `custom_keywords` from the request take precedence over the string stored on the
/// event. Tiers one to six are unioned; the fallback chain only runs when they produced
/// nothing, so the result is never empty.
pub fn derive_keywords(event: &Event, custom_keywords: Option<&str>) -> KeywordSet {
    let text = EventText::new(event);
    let mut set = KeywordSet::new();

    let custom = custom_keywords.or(event.custom_keywords.as_deref());
    add_custom_keywords(&mut set, custom);
    add_event_type_keywords(&mut set, event.event_type);
    add_text_analysis_keywords(&mut set, &text.full);
    add_pattern_keywords(&mut set, &text.title);
    add_semantic_keywords(&mut set, &text);
    add_format_keywords(&mut set, event.event_type, event.format);
    add_location_keywords(&mut set, &text.full);

    if set.is_empty() {
        add_fallback_keywords(&mut set, event);
    }

    set
}

fn add_custom_keywords(set: &mut KeywordSet, custom: Option<&str>) {
    let Some(raw) = custom else {
        return;
    };
    for keyword in split_custom_keywords(raw) {
        set.push(&keyword, KeywordSource::Custom);
    }
}

fn add_event_type_keywords(set: &mut KeywordSet, event_type: EventType) {
    for keyword in event_type.keywords() {
        set.push(keyword, KeywordSource::EventType);
    }
}

fn add_text_analysis_keywords(set: &mut KeywordSet, text: &MatchText) {
    for (domain, terms) in PROFESSIONAL_DOMAINS {
        let hits: Vec<_> = terms.iter().filter(|t| text.contains_term(t)).collect();
        if hits.is_empty() {
            continue;
        }
        for term in hits {
            set.push(term, KeywordSource::TextAnalysis);
        }
        set.push(domain, KeywordSource::TextAnalysis);
    }

    for tool in TOOLS_AND_TECHNOLOGIES {
        if text.contains_term(tool) {
            set.push(tool, KeywordSource::TextAnalysis);
        }
    }

    for (level, indicators) in SENIORITY_LEVELS {
        let hits: Vec<_> = indicators.iter().filter(|t| text.contains_term(t)).collect();
        if hits.is_empty() {
            continue;
        }
        for indicator in hits {
            set.push(indicator, KeywordSource::TextAnalysis);
        }
        set.push(level, KeywordSource::TextAnalysis);
    }
}

fn add_pattern_keywords(set: &mut KeywordSet, title: &MatchText) {
    for (prefix, keywords) in TITLE_PATTERNS {
        if title.as_str().starts_with(prefix) {
            for keyword in *keywords {
                set.push(keyword, KeywordSource::Pattern);
            }
        }
    }
}

fn add_semantic_keywords(set: &mut KeywordSet, text: &EventText) {
    for (tones, concepts) in SEMANTIC_TONES {
        if tones.iter().any(|t| text.full.contains_term(t)) {
            for concept in *concepts {
                set.push(concept, KeywordSource::Semantic);
            }
        }
    }

    if tokenize(text.title.as_str()).len() >= LONG_TITLE_WORDS {
        set.push(LONG_TITLE_KEYWORD, KeywordSource::Semantic);
    }

    for (cues, descriptor) in AUDIENCE_LEVELS.iter().chain(CONTENT_TYPES) {
        if cues.iter().any(|c| text.full.contains_term(c)) {
            set.push(descriptor, KeywordSource::Semantic);
        }
    }
}

fn add_format_keywords(set: &mut KeywordSet, event_type: EventType, format: Option<EventFormat>) {
    // Every virtual session is virtual; the format adds nothing there.
    if event_type == EventType::VirtualSession {
        return;
    }
    let keywords = match format {
        Some(EventFormat::Virtual) => VIRTUAL_FORMAT_KEYWORDS,
        Some(EventFormat::InPerson) => IN_PERSON_FORMAT_KEYWORDS,
        None => return,
    };
    for keyword in keywords {
        set.push(keyword, KeywordSource::Format);
    }
}

fn add_location_keywords(set: &mut KeywordSet, text: &MatchText) {
    for (label, cues) in LOCATION_CONTEXTS {
        if cues.iter().any(|c| text.contains_term(c)) {
            set.push(label, KeywordSource::Location);
        }
    }
}

fn add_fallback_keywords(set: &mut KeywordSet, event: &Event) {
    let title_words = tokenize(&event.title);

    for word in &title_words {
        if word.len() >= MIN_FALLBACK_WORD_LEN
            && word.chars().all(|c| c.is_ascii_alphabetic())
            && !STOP_WORDS.contains(&word.as_str())
        {
            set.push(word, KeywordSource::FallbackText);
        }
    }
    if !set.is_empty() {
        return;
    }

    if event.event_type != EventType::Other {
        set.push(&event.event_type.label(), KeywordSource::FallbackContextual);
    }
    for word in &title_words {
        if let Some((_, keyword)) = GENERIC_TITLE_WORDS.iter().find(|(w, _)| *w == word.as_str()) {
            set.push(keyword, KeywordSource::FallbackContextual);
        }
    }
    if !set.is_empty() {
        return;
    }

    for keyword in UNIVERSAL_FALLBACK {
        set.push(keyword, KeywordSource::FallbackUniversal);
    }
}
