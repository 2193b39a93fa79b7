use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";

/// Default birth year when none can be recovered: a typical 17-year-old prospect.
pub fn default_birth_year() -> i32 {
    Utc::now().year() - 17
}

/// Oldest plausible player age. The check is loose on purpose: it only
/// rejects typos like `208` or `3000`.
const MAX_PLAYER_AGE: i32 = 60;

/// `Some(year)` when it lies in `current-60 ..= current`.
pub fn plausible_birth_year(year: i32) -> Option<i32> {
    let current = Utc::now().year();
    (current - MAX_PLAYER_AGE..=current)
        .contains(&year)
        .then_some(year)
}

/// Three-level scouting rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    #[default]
    Tattico,
    Elettrico,
    Predatore,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Tattico => "Tattico",
            Rank::Elettrico => "Elettrico",
            Rank::Predatore => "Predatore",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a profile came from. Persisted as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileSource {
    #[serde(rename = "Manual Entry")]
    ManualEntry,
    #[serde(rename = "Parsed Report")]
    ParsedReport,
    #[serde(rename = "Quick Add")]
    QuickAdd,
    #[serde(rename = "Search Result")]
    SearchResult,
}

impl ProfileSource {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileSource::ManualEntry => "Manual Entry",
            ProfileSource::ParsedReport => "Parsed Report",
            ProfileSource::QuickAdd => "Quick Add",
            ProfileSource::SearchResult => "Search Result",
        }
    }
}

/// A finalized talent profile. Field names are the persistence contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub country: String,
    #[serde(rename = "year")]
    pub birth_year: i32,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub source: String,
    #[serde(default)]
    pub rank: Rank,
    pub insight: String,
}

/// Fields recovered from a raw report before tags and insight are attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialProfile {
    pub name: String,
    pub country: String,
    pub birth_year: i32,
    pub role: String,
    pub video: Option<String>,
    pub context: Option<String>,
}

impl Default for PartialProfile {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            birth_year: default_birth_year(),
            role: UNKNOWN.to_string(),
            video: None,
            context: None,
        }
    }
}

/// The profile shipped with the demo data set.
pub fn demo_profiles() -> Vec<PlayerProfile> {
    vec![PlayerProfile {
        name: "Gabriel Sanabria".to_string(),
        country: "Ecuador".to_string(),
        birth_year: 2008,
        role: "Central Midfielder".to_string(),
        club: Some("Independiente del Valle U17".to_string()),
        video: Some("https://twitter.com/scoutecuador/status/1234567890".to_string()),
        context: Some("2 assists vs LDU Quito U17 – Copa Mitad del Mundo".to_string()),
        tags: vec![
            "line-breaking pass".to_string(),
            "quick turn".to_string(),
            "calm under pressure".to_string(),
        ],
        source: "scout verified".to_string(),
        rank: Rank::Tattico,
        insight: "Trova linee di passaggio impossibili, un regista che spezza le difese con visione pura. \
                  Si gira con agilità sotto pressione, un talento che crea spazi dove non ce ne sono. \
                  Gestisce il gioco con lucidità, un faro che guida la squadra nei momenti cruciali."
            .to_string(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_birth_year_window() {
        let current = Utc::now().year();
        assert_eq!(plausible_birth_year(current), Some(current));
        assert_eq!(plausible_birth_year(current - 60), Some(current - 60));
        assert_eq!(plausible_birth_year(default_birth_year()), Some(default_birth_year()));
        assert_eq!(plausible_birth_year(current + 1), None);
        assert_eq!(plausible_birth_year(current - 61), None);
        assert_eq!(plausible_birth_year(-40), None);
    }

    #[test]
    fn test_rank_serde_uses_variant_names() {
        let json = serde_json::to_string(&Rank::Predatore).unwrap();
        assert_eq!(json, r#""Predatore""#);
        let rank: Rank = serde_json::from_str(r#""Elettrico""#).unwrap();
        assert_eq!(rank, Rank::Elettrico);
    }

    #[test]
    fn test_rank_rejects_unknown_value() {
        assert!(serde_json::from_str::<Rank>(r#""Difensivo""#).is_err());
    }

    #[test]
    fn test_profile_serializes_year_field_name() {
        let profile = demo_profiles().remove(0);
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["year"], 2008);
        assert!(value.get("birth_year").is_none());
        assert_eq!(value["rank"], "Tattico");
    }

    #[test]
    fn test_profile_deserializes_without_optional_fields() {
        let json = r#"{
            "name": "Jane Doe",
            "country": "Brazil",
            "year": 2009,
            "role": "Winger",
            "source": "Quick Add",
            "insight": "Nessun insight disponibile."
        }"#;
        let profile: PlayerProfile = serde_json::from_str(json).unwrap();
        assert!(profile.tags.is_empty());
        assert_eq!(profile.rank, Rank::Tattico);
        assert!(profile.club.is_none());
    }

    #[test]
    fn test_source_labels_match_serde() {
        let json = serde_json::to_string(&ProfileSource::SearchResult).unwrap();
        assert_eq!(json, format!("\"{}\"", ProfileSource::SearchResult.label()));
    }

    #[test]
    fn test_partial_profile_defaults() {
        let partial = PartialProfile::default();
        assert_eq!(partial.name, UNKNOWN);
        assert_eq!(partial.birth_year, default_birth_year());
    }
}
