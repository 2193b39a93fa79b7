//! Insight Generator — renders a tag list into prose in the requested register.

use serde::{Deserialize, Serialize};

use crate::scouting::vocabulary::Vocabulary;

/// Returned for an empty tag set, whatever the register.
pub const NO_INSIGHT: &str = "Nessun insight disponibile.";

/// Marker carried by tags coined at inference time.
pub const DERIVED_TAG_PREFIX: &str = "skill_";

/// Register of the generated prose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStyle {
    /// Scouting-report tone.
    Technical,
    /// Descriptive, figurative tone.
    #[default]
    Narrative,
}

/// Renders one sentence per tag, joined by a single space, in tag order.
pub fn render<S: AsRef<str>>(tags: &[S], style: InsightStyle, vocabulary: &Vocabulary) -> String {
    if tags.is_empty() {
        return NO_INSIGHT.to_string();
    }

    let sentences: Vec<String> = tags
        .iter()
        .map(|tag| render_tag(tag.as_ref(), style, vocabulary))
        .collect();

    sentences.join(" ")
}

fn render_tag(tag: &str, style: InsightStyle, vocabulary: &Vocabulary) -> String {
    match vocabulary.lookup(tag) {
        Some(descriptions) => match style {
            InsightStyle::Technical => descriptions.technical.clone(),
            InsightStyle::Narrative => descriptions.narrative.clone(),
        },
        None => {
            let skill = readable_skill(tag);
            match style {
                InsightStyle::Technical => format!("Abile in {skill}."),
                InsightStyle::Narrative => {
                    format!("Un talento emergente in {skill}, con qualità da osservare.")
                }
            }
        }
    }
}

/// `skill_quick_feet` → `quick feet`.
fn readable_skill(tag: &str) -> String {
    let tag = tag.trim();
    tag.strip_prefix(DERIVED_TAG_PREFIX)
        .unwrap_or(tag)
        .replace('_', " ")
        .to_lowercase()
}
