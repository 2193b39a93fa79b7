use serde::{Deserialize, Serialize};

use crate::models::profile::{PlayerProfile, UNKNOWN};

/// Soft rejection raised when a candidate looks like an existing profile.
/// Nothing is merged or deleted; the caller decides what to do with the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateProfileWarning {
    pub existing_index: usize,
    pub existing_name: String,
    pub birth_year: i32,
}

impl std::fmt::Display for DuplicateProfileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' ({}) already exists at position {}",
            self.existing_name, self.birth_year, self.existing_index
        )
    }
}

/// Finds the first existing profile the candidate duplicates.
///
/// Same birth year, and the existing lower-cased name contains the
/// candidate's, so "Sanabria" collides with a stored "Gabriel Sanabria" but a
/// stored "Al" does not block "Alejandro Gomez". Blank and `Unknown` names
/// never collide. `find_duplicate(..).is_some()` is the boolean check.
pub fn find_duplicate(
    candidate: &PlayerProfile,
    existing: &[PlayerProfile],
) -> Option<DuplicateProfileWarning> {
    let candidate_name = candidate.name.trim().to_lowercase();
    if is_anonymous(&candidate_name) {
        return None;
    }

    existing
        .iter()
        .enumerate()
        .find(|(_, profile)| {
            profile.birth_year == candidate.birth_year
                && profile.name.trim().to_lowercase().contains(&candidate_name)
        })
        .map(|(index, profile)| DuplicateProfileWarning {
            existing_index: index,
            existing_name: profile.name.clone(),
            birth_year: profile.birth_year,
        })
}

fn is_anonymous(lowered_name: &str) -> bool {
    lowered_name.is_empty() || lowered_name == UNKNOWN.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Rank;

    fn is_duplicate(candidate: &PlayerProfile, existing: &[PlayerProfile]) -> bool {
        find_duplicate(candidate, existing).is_some()
    }

    fn profile(name: &str, year: i32) -> PlayerProfile {
        PlayerProfile {
            name: name.to_string(),
            country: "Ecuador".to_string(),
            birth_year: year,
            role: "Central Midfielder".to_string(),
            club: None,
            video: None,
            context: None,
            tags: vec![],
            source: "Manual Entry".to_string(),
            rank: Rank::Tattico,
            insight: "Nessun insight disponibile.".to_string(),
        }
    }

    #[test]
    fn test_surname_same_year_is_duplicate() {
        let existing = vec![profile("Gabriel Sanabria", 2008)];
        assert!(is_duplicate(&profile("Sanabria", 2008), &existing));
    }

    #[test]
    fn test_surname_different_year_is_not_duplicate() {
        let existing = vec![profile("Gabriel Sanabria", 2008)];
        assert!(!is_duplicate(&profile("Sanabria", 2009), &existing));
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let existing = vec![profile("Gabriel Sanabria", 2008)];
        assert!(is_duplicate(&profile("GABRIEL SANABRIA", 2008), &existing));
    }

    #[test]
    fn test_longer_candidate_name_is_not_duplicate() {
        let existing = vec![profile("Sanabria", 2008)];
        assert!(!is_duplicate(&profile("Gabriel Sanabria", 2008), &existing));
    }

    #[test]
    fn test_short_existing_name_does_not_block_longer_candidate() {
        let existing = vec![profile("Al", 2008)];
        assert!(!is_duplicate(&profile("Alejandro Gomez", 2008), &existing));
    }

    #[test]
    fn test_warning_points_at_first_match() {
        let existing = vec![
            profile("Kendry Paez", 2007),
            profile("Gabriel Sanabria", 2008),
            profile("Sanabria Jr", 2008),
        ];
        let warning = find_duplicate(&profile("Sanabria", 2008), &existing).unwrap();
        assert_eq!(warning.existing_index, 1);
        assert_eq!(warning.existing_name, "Gabriel Sanabria");
    }

    #[test]
    fn test_blank_candidate_name_never_matches() {
        let existing = vec![profile("Gabriel Sanabria", 2008)];
        assert!(!is_duplicate(&profile("  ", 2008), &existing));
    }

    #[test]
    fn test_unknown_names_never_match() {
        let existing = vec![profile(UNKNOWN, 2008)];
        assert!(!is_duplicate(&profile(UNKNOWN, 2008), &existing));
        assert!(!is_duplicate(&profile("unknown", 2008), &existing));
    }

    #[test]
    fn test_empty_existing_list() {
        assert!(!is_duplicate(&profile("Sanabria", 2008), &[]));
    }
}
