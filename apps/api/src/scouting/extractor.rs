//! Field Extractor — pulls name, country, year, role, video and context out of
//! a raw report.
//!
//! Two modes:
//! - shorthand: `name, country, year, role` (strict; fewer than four fields is an error)
//! - free text: independent regex passes, each falling back to a default
//!
//! `ExtractMode::Auto` picks shorthand when the text has exactly four
//! comma-separated parts.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::{default_birth_year, plausible_birth_year, PartialProfile, UNKNOWN};

const SHORTHAND_FIELDS: usize = 4;
const CONTEXT_WINDOW: usize = 100;
/// Birth years accepted from free text: players aged 15 to 20 this year.
const YOUNGEST_AGE: i32 = 15;
const OLDEST_AGE: i32 = 20;

const COUNTRIES: &[&str] = &[
    "south africa",
    "netherlands",
    "argentina",
    "colombia",
    "paraguay",
    "portugal",
    "uruguay",
    "belgium",
    "ecuador",
    "england",
    "germany",
    "nigeria",
    "senegal",
    "brazil",
    "france",
    "mexico",
    "ghana",
    "italy",
    "japan",
    "spain",
];

/// Multi-word and hyphenated roles come before their single-word suffixes so
/// the alternation prefers "attacking midfielder" over "midfielder".
const ROLES: &[&str] = &[
    "attacking midfielder",
    "defensive midfielder",
    "central midfielder",
    "centre-back",
    "centre back",
    "center-back",
    "center back",
    "full-back",
    "wing-back",
    "goalkeeper",
    "midfielder",
    "defender",
    "forward",
    "striker",
    "winger",
];

const CONTEXT_KEYWORDS: &[&str] = &[
    "match",
    "game",
    "tournament",
    "goal",
    "assist",
    "dribbling",
    "copa",
    "championship",
];

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)?\b").expect("static regex"));

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").expect("static regex"));

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("static regex"));

static COUNTRY_RE: Lazy<Regex> = Lazy::new(|| alternation(COUNTRIES));

static ROLE_RE: Lazy<Regex> = Lazy::new(|| alternation(ROLES));

static CONTEXT_RE: Lazy<Regex> = Lazy::new(|| {
    let keywords = CONTEXT_KEYWORDS.join("|");
    Regex::new(&format!(
        r"(?i).{{0,{CONTEXT_WINDOW}}}(?:{keywords}).{{0,{CONTEXT_WINDOW}}}"
    ))
    .expect("static regex")
});

/// Case-insensitive whole-word alternation; earliest position wins, then list order.
fn alternation(words: &[&str]) -> Regex {
    let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", escaped.join("|"))).expect("static regex")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    #[default]
    Auto,
    Shorthand,
    FreeText,
}

pub fn extract(text: &str, mode: ExtractMode) -> Result<PartialProfile, AppError> {
    match mode {
        ExtractMode::Shorthand => parse_shorthand(text),
        ExtractMode::FreeText => Ok(extract_free_text(text)),
        ExtractMode::Auto if text.split(',').count() == SHORTHAND_FIELDS => parse_shorthand(text),
        ExtractMode::Auto => Ok(extract_free_text(text)),
    }
}

/// Parses `name, country, year, role[, extra...]`. Extra parts become context.
pub fn parse_shorthand(text: &str) -> Result<PartialProfile, AppError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() < SHORTHAND_FIELDS {
        return Err(AppError::MalformedReport(format!(
            "expected {SHORTHAND_FIELDS} comma-separated fields (name, country, year, role), got {}",
            parts.len()
        )));
    }

    let context = parts[SHORTHAND_FIELDS..]
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    Ok(PartialProfile {
        name: or_unknown(parts[0]),
        country: or_unknown(parts[1]),
        birth_year: parts[2]
            .parse()
            .ok()
            .and_then(plausible_birth_year)
            .unwrap_or_else(default_birth_year),
        role: or_unknown(parts[3]),
        video: None,
        context: (!context.is_empty()).then_some(context),
    })
}

pub fn extract_free_text(text: &str) -> PartialProfile {
    PartialProfile {
        name: NAME_RE
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        country: COUNTRY_RE
            .find(text)
            .map(|m| title_case(m.as_str()))
            .unwrap_or_else(|| UNKNOWN.to_string()),
        birth_year: find_birth_year(text, Utc::now().year()).unwrap_or_else(default_birth_year),
        role: ROLE_RE
            .find(text)
            .map(|m| title_case(m.as_str()))
            .unwrap_or_else(|| UNKNOWN.to_string()),
        video: URL_RE.find(text).map(|m| m.as_str().to_string()),
        context: CONTEXT_RE
            .find(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|c| !c.is_empty()),
    }
}

/// First four-digit token inside the prospect age window relative to `current_year`.
fn find_birth_year(text: &str, current_year: i32) -> Option<i32> {
    let window = (current_year - OLDEST_AGE)..=(current_year - YOUNGEST_AGE);
    YEAR_RE
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<i32>().ok())
        .find(|year| window.contains(year))
}

fn or_unknown(field: &str) -> String {
    if field.is_empty() {
        UNKNOWN.to_string()
    } else {
        field.to_string()
    }
}

/// Title-cases each space- and hyphen-separated word: "centre-back" → "Centre-Back".
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = c == ' ' || c == '-';
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthand_happy_path() {
        let partial = extract("Jane Doe, Brazil, 2009, Winger", ExtractMode::Shorthand).unwrap();
        assert_eq!(partial.name, "Jane Doe");
        assert_eq!(partial.country, "Brazil");
        assert_eq!(partial.birth_year, 2009);
        assert_eq!(partial.role, "Winger");
        assert!(partial.context.is_none());
    }

    #[test]
    fn test_auto_mode_detects_shorthand() {
        let partial = extract("Jane Doe, Brazil, 2009, Winger", ExtractMode::Auto).unwrap();
        assert_eq!(partial.birth_year, 2009);
        assert_eq!(partial.role, "Winger");
    }

    #[test]
    fn test_shorthand_too_few_fields_is_malformed() {
        let err = extract("Jane Doe, Brazil", ExtractMode::Shorthand).unwrap_err();
        assert!(matches!(err, AppError::MalformedReport(_)));
    }

    #[test]
    fn test_auto_mode_never_fails_on_two_fields() {
        let partial = extract("Jane Doe, Brazil", ExtractMode::Auto).unwrap();
        assert_eq!(partial.name, "Jane Doe");
        assert_eq!(partial.country, "Brazil");
    }

    #[test]
    fn test_shorthand_bad_year_defaults() {
        let partial = parse_shorthand("Jane Doe, Brazil, twenty, Winger").unwrap();
        assert_eq!(partial.birth_year, default_birth_year());
    }

    #[test]
    fn test_shorthand_implausible_year_defaults() {
        for year in ["1", "3000", "-40"] {
            let line = format!("Jane Doe, Brazil, {year}, Winger");
            let partial = parse_shorthand(&line).unwrap();
            assert_eq!(partial.birth_year, default_birth_year(), "year {year}");
        }
    }

    #[test]
    fn test_shorthand_blank_fields_default_to_unknown() {
        let partial = parse_shorthand(" , , 2009, ").unwrap();
        assert_eq!(partial.name, UNKNOWN);
        assert_eq!(partial.country, UNKNOWN);
        assert_eq!(partial.role, UNKNOWN);
    }

    #[test]
    fn test_shorthand_extra_fields_become_context() {
        let partial =
            parse_shorthand("Jane Doe, Brazil, 2009, Winger, Santos U17, two assists").unwrap();
        assert_eq!(partial.role, "Winger");
        assert_eq!(partial.context.as_deref(), Some("Santos U17, two assists"));
    }

    #[test]
    fn test_free_text_extracts_all_fields() {
        let current = Utc::now().year();
        let year = current - 17;
        let post = format!(
            "Kendry Paez from Ecuador, born {year}, attacking midfielder. \
             Scored a stunning goal in the Copa final https://youtu.be/abc123 watch it"
        );
        let partial = extract_free_text(&post);
        assert_eq!(partial.name, "Kendry Paez");
        assert_eq!(partial.country, "Ecuador");
        assert_eq!(partial.birth_year, year);
        assert_eq!(partial.role, "Attacking Midfielder");
        assert_eq!(partial.video.as_deref(), Some("https://youtu.be/abc123"));
        let context = partial.context.unwrap();
        assert!(context.contains("goal"));
        assert!(context.len() <= 2 * CONTEXT_WINDOW + "championship".len());
    }

    #[test]
    fn test_free_text_multiword_country() {
        let partial = extract_free_text("Relebohile Mofokeng, South Africa, is a winger");
        assert_eq!(partial.country, "South Africa");
    }

    #[test]
    fn test_free_text_hyphenated_role_is_title_cased() {
        let partial = extract_free_text("solid centre-back, strong in the air");
        assert_eq!(partial.role, "Centre-Back");
    }

    #[test]
    fn test_free_text_defaults_when_nothing_matches() {
        let partial = extract_free_text("nothing useful here");
        assert_eq!(partial.name, UNKNOWN);
        assert_eq!(partial.country, UNKNOWN);
        assert_eq!(partial.role, UNKNOWN);
        assert_eq!(partial.birth_year, default_birth_year());
        assert!(partial.video.is_none());
        assert!(partial.context.is_none());
    }

    #[test]
    fn test_birth_year_window() {
        assert_eq!(find_birth_year("founded 1998, born 2009", 2026), Some(2009));
        assert_eq!(find_birth_year("born 2001", 2026), None);
        assert_eq!(find_birth_year("born 2012", 2026), None);
        assert_eq!(find_birth_year("born 2006 or 2011", 2026), Some(2006));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("south africa"), "South Africa");
        assert_eq!(title_case("WING-BACK"), "Wing-Back");
    }
}
