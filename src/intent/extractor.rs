//! Intent extractor
//!
//! Turns a raw message into an [`Intent`] by walking an ordered list of
//! rules. Each rule is a pure predicate plus a slot extractor; the first
//! predicate that accepts the text decides the kind. Extractors always fall
//! back to the slot defaults, so workflows never see a missing parameter.

use regex::Regex;
use std::sync::LazyLock;

use crate::core::{Intent, IntentKind, Slots};
use crate::intent::slots::{self, defaults};

/// Terminators are matched case-insensitively against the original text so
/// captured values keep the user's casing.
static OPEN_APP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bopen\s+(.+?)(?:\s+(?:and|to|for)\b|$)").expect("valid open pattern")
});

static MOVIE_AFTER_FOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfor\s+(.+?)(?:\s+(?:in|at|tomorrow)\b|$)").expect("valid movie pattern")
});

static MOVIE_AFTER_MOVIE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bmovie\s+(.+?)(?:\s+(?:in|at|tomorrow)\b|$)").expect("valid movie pattern")
});

static CITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:in|at)\s+(.+?)(?:\s+(?:tomorrow|this)\b|$)").expect("valid city pattern")
});

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(today|tonight|tomorrow|this\s+\w+)\b").expect("valid date pattern")
});

static WEATHER_THEN_PLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bweather\s+(?:in|at|for)\s+(.+)$").expect("valid weather pattern")
});

static PLACE_THEN_WEATHER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:in|at)\s+(.+?)\s+weather\b").expect("valid weather pattern")
});

/// Last resort for phrasings like "what is the weather like in Pune"
static TRAILING_PLACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:in|at|for)\s+(.+)$").expect("valid weather pattern")
});

static VIDEO_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:play|search)\s+(.+?)(?:\s+on\s+youtube\b|$)").expect("valid video pattern")
});

/// One extraction rule: accepts lowercased text, extracts from the original
struct Rule {
    kind: IntentKind,
    matches: fn(&str) -> bool,
    extract: fn(&str) -> Slots,
}

/// Rules in priority order; ties resolve to the earliest entry.
const RULES: &[Rule] = &[
    Rule {
        kind: IntentKind::OpenApplication,
        matches: is_open_request,
        extract: extract_app,
    },
    Rule {
        kind: IntentKind::SearchTickets,
        matches: is_ticket_request,
        extract: extract_tickets,
    },
    Rule {
        kind: IntentKind::GetWeather,
        matches: is_weather_request,
        extract: extract_weather,
    },
    Rule {
        kind: IntentKind::PlayVideo,
        matches: is_video_request,
        extract: extract_video,
    },
];

/// Rule-based intent extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentExtractor;

impl IntentExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract an intent from raw text. Never fails.
    pub fn extract(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();

        for rule in RULES {
            if (rule.matches)(&lowered) {
                let slots = (rule.extract)(text);
                tracing::debug!(kind = %rule.kind, ?slots, "Intent rule matched");
                return Intent::new(rule.kind, slots);
            }
        }

        let mut slots = Slots::new();
        slots.insert(slots::MESSAGE.to_string(), text.to_string());
        Intent::new(IntentKind::GenericChat, slots)
    }
}

fn is_open_request(lowered: &str) -> bool {
    OPEN_APP.is_match(lowered)
}

fn is_ticket_request(lowered: &str) -> bool {
    lowered.contains("bookmyshow") || lowered.contains("movie tickets")
}

fn is_weather_request(lowered: &str) -> bool {
    lowered.contains("weather")
}

fn is_video_request(lowered: &str) -> bool {
    lowered.contains("youtube") && (lowered.contains("play") || lowered.contains("search"))
}

fn extract_app(text: &str) -> Slots {
    let mut slots = Slots::new();
    if let Some(app) = capture(&OPEN_APP, text) {
        slots.insert(slots::APP_NAME.to_string(), app);
    }
    slots
}

fn extract_tickets(text: &str) -> Slots {
    let movie = capture(&MOVIE_AFTER_FOR, text)
        .or_else(|| capture(&MOVIE_AFTER_MOVIE, text).and_then(strip_tickets_word))
        .unwrap_or_else(|| defaults::MOVIE.to_string());
    let city = capture(&CITY, text).unwrap_or_else(|| defaults::CITY.to_string());

    let mut slots = Slots::new();
    slots.insert(slots::MOVIE.to_string(), movie);
    slots.insert(slots::CITY.to_string(), city);
    if let Some(date) = capture(&DATE, text) {
        slots.insert(slots::DATE.to_string(), date.to_lowercase());
    }
    slots
}

fn extract_weather(text: &str) -> Slots {
    let location = capture(&WEATHER_THEN_PLACE, text)
        .or_else(|| capture(&PLACE_THEN_WEATHER, text))
        .or_else(|| capture(&TRAILING_PLACE, text))
        .unwrap_or_else(|| defaults::LOCATION.to_string());

    let mut slots = Slots::new();
    slots.insert(slots::LOCATION.to_string(), location);
    slots
}

fn extract_video(text: &str) -> Slots {
    let query = capture(&VIDEO_QUERY, text)
        .and_then(strip_site_words)
        .unwrap_or_else(|| defaults::QUERY.to_string());

    let mut slots = Slots::new();
    slots.insert(slots::QUERY.to_string(), query);
    slots
}

/// First capture group, trimmed of whitespace and trailing punctuation.
fn capture(pattern: &Regex, text: &str) -> Option<String> {
    let value = pattern.captures(text)?.get(1)?.as_str();
    let value = value
        .trim()
        .trim_end_matches(['?', '!', '.', ','])
        .trim_end();
    (!value.is_empty()).then(|| value.to_string())
}

/// "movie tickets for ..." would otherwise capture the word "tickets".
fn strip_tickets_word(value: String) -> Option<String> {
    let rest = strip_word(&value, "tickets").unwrap_or(&value);
    (!rest.is_empty()).then(|| rest.to_string())
}

/// "search youtube for cats" should search for "cats".
fn strip_site_words(value: String) -> Option<String> {
    let mut rest = value.as_str();
    for word in ["youtube", "for"] {
        rest = strip_word(rest, word).unwrap_or(rest);
    }
    (!rest.is_empty()).then(|| rest.to_string())
}

fn strip_word<'a>(value: &'a str, word: &str) -> Option<&'a str> {
    let head = value.get(..word.len())?;
    if !head.eq_ignore_ascii_case(word) {
        return None;
    }
    let tail = &value[word.len()..];
    if tail.is_empty() || tail.starts_with(char::is_whitespace) {
        Some(tail.trim_start())
    } else {
        None
    }
}
