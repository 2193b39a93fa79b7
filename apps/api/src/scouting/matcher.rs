//! Fuzzy Tag Matcher — maps an arbitrary token onto the nearest canonical tag.
//!
//! A canonical tag matches when either string contains the other, or when the
//! Levenshtein distance between them is below `MAX_EDIT_DISTANCE`. The first
//! match in vocabulary order wins.

use strsim::levenshtein;

use crate::scouting::vocabulary::Vocabulary;

/// Distances strictly below this count as a match.
const MAX_EDIT_DISTANCE: usize = 2;

/// Returns the canonical tag id for `token`, or `None` when nothing matches.
///
/// Minimum token length is enforced by the calling tier, not here.
pub fn canonicalize<'v>(token: &str, vocabulary: &'v Vocabulary) -> Option<&'v str> {
    let token = token.trim().to_lowercase();
    if token.is_empty() {
        return None;
    }

    // Exact hit first, so every canonical id maps to itself regardless of order.
    if let Some(id) = vocabulary.tag_ids().find(|id| *id == token) {
        return Some(id);
    }

    vocabulary.tag_ids().find(|id| is_match(&token, id))
}

fn is_match(token: &str, tag_id: &str) -> bool {
    token.contains(tag_id) || tag_id.contains(token) || levenshtein(token, tag_id) < MAX_EDIT_DISTANCE
}
