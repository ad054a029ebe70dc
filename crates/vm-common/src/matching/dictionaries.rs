//! Static lookup tables used by keyword derivation.
//!
//! Every entry is already lower-cased. Terms are matched with
//! [`MatchText::contains_term`](crate::normalize::MatchText::contains_term), so single
//! words also hit their longer inflections.

/// Professional domains: `(domain label, trigger terms)`.
pub const PROFESSIONAL_DOMAINS: &[(&str, &[&str])] = &[
    (
        "technology",
        &[
            "technology",
            "tech",
            "software",
            "programming",
            "coding",
            "computer",
            "cybersecurity",
            "it",
            "web development",
            "robotics",
            "artificial intelligence",
            "ai",
            "data science",
            "cloud",
        ],
    ),
    (
        "business",
        &[
            "business",
            "entrepreneur",
            "startup",
            "management",
            "strategy",
            "operations",
            "consulting",
        ],
    ),
    (
        "healthcare",
        &[
            "health",
            "medical",
            "medicine",
            "nursing",
            "hospital",
            "clinical",
            "doctor",
            "pharmacy",
            "wellness",
        ],
    ),
    (
        "education",
        &[
            "education",
            "teaching",
            "teacher",
            "school",
            "tutoring",
            "college",
            "university",
            "literacy",
            "curriculum",
        ],
    ),
    (
        "finance",
        &[
            "finance",
            "financial",
            "banking",
            "budget",
            "accounting",
            "invest",
            "money",
            "credit",
        ],
    ),
    (
        "marketing",
        &[
            "marketing",
            "advertising",
            "branding",
            "social media",
            "communications",
            "public relations",
        ],
    ),
    (
        "sales",
        &["sales", "selling", "customer service", "retail", "negotiation"],
    ),
    (
        "engineering",
        &[
            "engineering",
            "engineer",
            "mechanical",
            "electrical",
            "civil engineering",
            "manufacturing",
            "construction",
        ],
    ),
    (
        "science",
        &[
            "science",
            "biology",
            "chemistry",
            "physics",
            "research",
            "laboratory",
            "environmental",
            "stem",
        ],
    ),
    (
        "arts",
        &[
            "art",
            "arts",
            "paint",
            "music",
            "theater",
            "theatre",
            "design",
            "drawing",
            "sculpture",
            "photography",
            "creative writing",
            "dance",
            "film",
        ],
    ),
];

/// Named tools and technologies; a hit adds the tool name itself.
pub const TOOLS_AND_TECHNOLOGIES: &[&str] = &[
    "excel",
    "tableau",
    "power bi",
    "python",
    "java",
    "javascript",
    "sql",
    "github",
    "photoshop",
    "canva",
    "figma",
    "salesforce",
    "autocad",
    "powerpoint",
    "google sheets",
];

/// Seniority indicators: `(level label, indicator terms)`.
pub const SENIORITY_LEVELS: &[(&str, &[&str])] = &[
    (
        "executive",
        &[
            "ceo",
            "cfo",
            "cto",
            "executive",
            "vice president",
            "president",
            "chief",
        ],
    ),
    ("senior", &["senior", "director", "principal", "head of"]),
    ("management", &["manager", "supervisor", "team lead"]),
    ("entry level", &["entry level", "entry-level", "junior", "internship"]),
];

/// Title prefixes and the structural keywords they imply.
pub const TITLE_PATTERNS: &[(&str, &[&str])] = &[
    ("how to", &["tutorial", "learning"]),
    ("career in", &["career guidance", "career exploration"]),
    ("building", &["hands-on", "project"]),
    ("understanding", &["research", "exploration"]),
    ("connecting", &["networking", "collaboration"]),
    ("preparing for", &["planning", "readiness"]),
];

/// Tone words and the concepts they carry.
pub const SEMANTIC_TONES: &[(&[&str], &[&str])] = &[
    (
        &["inspiring", "inspire", "motivating", "motivate"],
        &["inspiration", "motivation"],
    ),
    (
        &["solving", "solve", "addressing", "tackling"],
        &["problem solving"],
    ),
    (
        &["innovative", "innovation", "creative", "creativity"],
        &["innovation", "creativity"],
    ),
    (
        &["leading", "managing", "leadership"],
        &["leadership", "management"],
    ),
    (
        &["community", "service"],
        &["community service", "civic engagement"],
    ),
];

/// Audience-level cues.
pub const AUDIENCE_LEVELS: &[(&[&str], &str)] = &[
    (
        &["beginner", "intro", "introduction", "introductory"],
        "beginner friendly",
    ),
    (&["advanced", "expert"], "expert level"),
    (&["all levels", "everyone", "all ages"], "all levels"),
];

/// Content-type cues.
pub const CONTENT_TYPES: &[(&[&str], &str)] = &[
    (&["workshop", "hands-on", "build"], "hands-on"),
    (&["theory", "concepts", "theoretical"], "theoretical"),
    (&["meet", "mixer", "networking"], "networking"),
];

/// Titles with at least this many words are tagged `in-depth`.
pub const LONG_TITLE_WORDS: usize = 8;

pub const LONG_TITLE_KEYWORD: &str = "in-depth";

/// Location context: `(label, indicator terms)`.
pub const LOCATION_CONTEXTS: &[(&str, &[&str])] = &[
    ("urban", &["downtown", "urban", "city", "metro"]),
    ("suburban", &["suburb"]),
    ("rural", &["rural", "farm", "countryside", "small town"]),
];

pub const VIRTUAL_FORMAT_KEYWORDS: &[&str] = &["virtual", "remote", "online"];

pub const IN_PERSON_FORMAT_KEYWORDS: &[&str] = &["in-person", "onsite"];

/// Words dropped when falling back to raw title words.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "into", "onto", "about", "your", "our", "their",
    "this", "that", "these", "those", "are", "was", "were", "will", "can", "how", "what",
    "why", "who", "when", "where", "all", "any", "you", "out", "new", "day", "night",
    "event", "events", "session", "sessions", "meeting", "meetup", "workshop", "program",
];

/// Generic title words that still say something about the event.
pub const GENERIC_TITLE_WORDS: &[(&str, &str)] = &[
    ("session", "learning"),
    ("sessions", "learning"),
    ("day", "community"),
    ("night", "community"),
    ("meeting", "networking"),
    ("meetup", "networking"),
    ("workshop", "hands-on"),
    ("event", "volunteer opportunity"),
    ("events", "volunteer opportunity"),
    ("program", "volunteer opportunity"),
];

/// Absolute floor when nothing else can be derived.
pub const UNIVERSAL_FALLBACK: &[&str] = &["volunteer", "event", "participation"];

/// Minimum length of a raw title word kept by the text fallback.
pub const MIN_FALLBACK_WORD_LEN: usize = 3;
