//! Tag Inference Pipeline — resolves free text into an ordered tag set.
//!
//! Tiers, tried in order until one yields something:
//! 1. external model: scored tokens above a threshold, canonicalized. Only
//!    tokens that occur in the text itself are kept
//! 2. keyword map: 1-grams and adjacent 2-grams looked up in the vocabulary's
//!    keyword map, with the fuzzy matcher as a per-token fallback
//! 3. generic: every token longer than three characters, as a derived tag
//!
//! A failing model never surfaces as an error; the pipeline just moves on.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::scouting::insight::DERIVED_TAG_PREFIX;
use crate::scouting::matcher::canonicalize;
use crate::scouting::scorer::TextScorer;
use crate::scouting::vocabulary::Vocabulary;

/// Tokens at or below this length are ignored by the model and generic tiers.
const SHORT_TOKEN_LEN: usize = 3;
/// The fuzzy fallback in the keyword tier needs at least this many characters.
const FUZZY_MIN_LEN: usize = 4;

const STOP_WORDS: &[&str] = &[
    "that", "this", "with", "from", "have", "were", "they", "their", "them", "then", "than",
    "into", "over", "very", "just", "also", "been", "when", "what", "which", "while", "about",
    "after", "before", "there", "here", "where", "will", "would", "could", "should",
];

/// Tuning knobs for inference. Heuristic values, not invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceSettings {
    pub score_threshold: f32,
    pub model_tag_cap: usize,
    pub tier_tag_cap: usize,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            score_threshold: 0.5,
            model_tag_cap: 5,
            tier_tag_cap: 5,
        }
    }
}

/// Which tier produced the tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceTier {
    Model,
    Keyword,
    Generic,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inference {
    pub tags: Vec<String>,
    pub tier: InferenceTier,
}

impl Inference {
    pub fn empty() -> Self {
        Self {
            tags: Vec::new(),
            tier: InferenceTier::None,
        }
    }
}

/// Insertion-ordered, de-duplicated tag collection with a size cap.
struct TagSet {
    tags: IndexSet<String>,
    cap: usize,
}

impl TagSet {
    fn with_cap(cap: usize) -> Self {
        Self {
            tags: IndexSet::new(),
            cap,
        }
    }

    fn is_full(&self) -> bool {
        self.tags.len() >= self.cap
    }

    fn insert(&mut self, tag: impl Into<String>) {
        if !self.is_full() {
            self.tags.insert(tag.into());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.tags.into_iter().collect()
    }
}

/// Lower-cases and splits on anything that is not a word character.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

pub fn derived_tag(token: &str) -> String {
    format!("{DERIVED_TAG_PREFIX}{token}")
}

pub async fn infer_tags(
    text: &str,
    scorer: Option<&dyn TextScorer>,
    vocabulary: &Vocabulary,
    settings: &InferenceSettings,
) -> Inference {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Inference::empty();
    }

    if let Some(scorer) = scorer {
        let tags = model_tier(text, &tokens, scorer, vocabulary, settings).await;
        if !tags.is_empty() {
            return Inference {
                tags,
                tier: InferenceTier::Model,
            };
        }
    }

    let tags = keyword_tier(&tokens, vocabulary, settings.tier_tag_cap);
    if !tags.is_empty() {
        return Inference {
            tags,
            tier: InferenceTier::Keyword,
        };
    }

    let tags = generic_tier(&tokens, settings.tier_tag_cap);
    let tier = if tags.is_empty() {
        InferenceTier::None
    } else {
        InferenceTier::Generic
    };
    Inference { tags, tier }
}

async fn model_tier(
    text: &str,
    tokens: &[String],
    scorer: &dyn TextScorer,
    vocabulary: &Vocabulary,
    settings: &InferenceSettings,
) -> Vec<String> {
    let scores = match scorer.score(text).await {
        Ok(scores) => scores,
        Err(e) => {
            warn!("Inference degraded, model tier skipped: {e}");
            return Vec::new();
        }
    };

    let in_text: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let mut set = TagSet::with_cap(settings.model_tag_cap);
    for scored in scores {
        if set.is_full() {
            break;
        }
        if scored.score <= settings.score_threshold {
            continue;
        }
        // Scorer output is re-tokenized the same way as the text; anything the
        // text does not contain is dropped.
        for token in tokenize(&scored.token) {
            if !in_text.contains(token.as_str())
                || token.chars().count() <= SHORT_TOKEN_LEN
                || STOP_WORDS.contains(&token.as_str())
            {
                continue;
            }
            match canonicalize(&token, vocabulary) {
                Some(id) => set.insert(id),
                None => set.insert(derived_tag(&token)),
            }
        }
    }

    debug!("Model tier produced {} tags", set.tags.len());
    set.into_vec()
}

fn keyword_tier(tokens: &[String], vocabulary: &Vocabulary, cap: usize) -> Vec<String> {
    let mut set = TagSet::with_cap(cap);

    for (i, token) in tokens.iter().enumerate() {
        if set.is_full() {
            break;
        }

        let mut hit = false;
        for target in vocabulary.keyword_targets(token) {
            set.insert(target.as_str());
            hit = true;
        }
        if let Some(next) = tokens.get(i + 1) {
            let bigram = format!("{token} {next}");
            for target in vocabulary.keyword_targets(&bigram) {
                set.insert(target.as_str());
                hit = true;
            }
        }

        if !hit && token.chars().count() >= FUZZY_MIN_LEN {
            if let Some(id) = canonicalize(token, vocabulary) {
                set.insert(id);
            }
        }
    }

    set.into_vec()
}

fn generic_tier(tokens: &[String], cap: usize) -> Vec<String> {
    let mut set = TagSet::with_cap(cap);
    for token in tokens.iter().filter(|t| t.chars().count() > SHORT_TOKEN_LEN) {
        set.insert(derived_tag(token));
    }
    set.into_vec()
}
