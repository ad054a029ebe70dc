use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9][a-z0-9+#]*").unwrap());

/// Keywords this short only match whole tokens ("ai" must not hit "maintenance").
const SHORT_KEYWORD_MAX_LEN: usize = 3;

/// NFKC-folds, lower-cases and collapses runs of whitespace into a single space.
pub fn normalize_text(raw: &str) -> String {
    let folded = raw.nfkc().collect::<String>();
    RE_WHITESPACE
        .replace_all(folded.trim(), " ")
        .to_lowercase()
}

/// Splits a user supplied `"a, b ,,c"` string into normalized keywords.
///
/// Never fails: empty or garbage input yields an empty list. Order is preserved and
/// repeated keywords are dropped.
pub fn split_custom_keywords(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(normalize_text)
        .filter(|keyword| !keyword.is_empty())
        .filter(|keyword| seen.insert(keyword.clone()))
        .collect()
}

/// Lower-cased word tokens of `raw`, in order of appearance.
pub fn tokenize(raw: &str) -> Vec<String> {
    let lowered = raw.nfkc().collect::<String>().to_lowercase();
    RE_TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Pre-normalized text for repeated keyword containment checks.
#[derive(Debug, Clone, Default)]
pub struct MatchText {
    text: String,
    tokens: HashSet<String>,
}

impl MatchText {
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize_text(raw),
            tokens: tokenize(raw).into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-insensitive keyword test: whole-token for short keywords, substring otherwise.
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        if keyword.is_empty() || self.text.is_empty() {
            return false;
        }
        if keyword.len() <= SHORT_KEYWORD_MAX_LEN {
            self.tokens.contains(keyword)
        } else {
            self.text.contains(keyword)
        }
    }

    /// Dictionary term test used when scanning event text.
    ///
    /// Phrases match as substrings. Single words match a whole token, or a token prefix
    /// when the word has at least four characters (`paint` hits `painting`, `city` does
    /// not hit `electricity`).
    pub fn contains_term(&self, term: &str) -> bool {
        if term.is_empty() || self.text.is_empty() {
            return false;
        }
        if term.contains(' ') || term.contains('-') {
            return self.text.contains(term);
        }
        self.tokens.iter().any(|token| {
            token == term || (term.len() > SHORT_KEYWORD_MAX_LEN && token.starts_with(term))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_keywords_are_split_trimmed_and_lowercased() {
        assert_eq!(
            split_custom_keywords(" Python, Data  Science ,,ROBOTICS "),
            vec!["python", "data science", "robotics"]
        );
    }

    #[test]
    fn custom_keywords_tolerate_empty_and_malformed_input() {
        assert!(split_custom_keywords("").is_empty());
        assert!(split_custom_keywords(" , ,, ").is_empty());
        assert_eq!(split_custom_keywords("a,A, a "), vec!["a"]);
    }

    #[test]
    fn full_width_input_is_folded() {
        assert_eq!(normalize_text("ＰＹＴＨＯＮ　Ｄａｔａ"), "python data");
        assert_eq!(tokenize("Ｃ＋＋ Lead"), vec!["c++", "lead"]);
    }

    #[test]
    fn tokenize_keeps_language_symbols() {
        assert_eq!(tokenize("C++ and C# / UI-UX"), vec!["c++", "and", "c#", "ui", "ux"]);
    }

    #[test]
    fn short_keywords_require_whole_tokens() {
        let text = MatchText::new("Maintenance Supervisor");
        assert!(!text.contains_keyword("ai"));
        assert!(text.contains_keyword("maintenance"));

        let text = MatchText::new("AI Research Lead");
        assert!(text.contains_keyword("ai"));
    }

    #[test]
    fn long_keywords_match_as_substrings() {
        let text = MatchText::new("Senior  Career Counselor");
        assert!(text.contains_keyword("career"));
        assert!(text.contains_keyword("career counselor"));
        assert!(!text.contains_keyword("resume"));
        assert!(!MatchText::new("").contains_keyword("career"));
    }

    #[test]
    fn terms_match_tokens_and_stems_only() {
        let text = MatchText::new("Painting the city's electricity grid, hands-on");
        assert!(text.contains_term("paint"));
        assert!(text.contains_term("city"));
        assert!(text.contains_term("hands-on"));
        assert!(!text.contains_term("tric"));
        assert!(!text.contains_term("art"));
    }
}
