//! Vocabulary Store — canonical skill tags with their technical and narrative
//! descriptions, plus the keyword map consulted by the keyword tier.
//!
//! Built once at startup (built-in defaults or a JSON file) and shared as
//! `Arc<Vocabulary>`. Nothing mutates it after construction.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid vocabulary JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Vocabulary has no canonical tags")]
    Empty,

    #[error("Tag '{0}' has an empty description")]
    EmptyDescription(String),

    #[error("Keyword '{keyword}' maps to unknown tag '{tag}'")]
    UnknownKeywordTarget { keyword: String, tag: String },
}

/// Prose for a canonical tag in both registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDescriptions {
    pub technical: String,
    pub narrative: String,
}

/// Read-only tag vocabulary. Iteration order is insertion order and is part of
/// the matching contract: the fuzzy matcher returns the first hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    tags: IndexMap<String, TagDescriptions>,
    #[serde(default)]
    keywords: IndexMap<String, Vec<String>>,
}

const BUILTIN_TAGS: &[(&str, &str, &str)] = &[
    (
        "explosive dribbling",
        "Efficace in dribbling nello stretto con accelerazioni rapide.",
        "Supera gli avversari con un ritmo travolgente, un’ala che illumina il campo con la sua energia.",
    ),
    (
        "final pass",
        "Precisione elevata nei passaggi decisivi in area avversaria.",
        "Conclude l’azione con un passaggio decisivo, un artista che dipinge l’ultimo tocco per il gol.",
    ),
    (
        "calm under pressure",
        "Mantiene focus e decisione in situazioni di alta pressione.",
        "Gestisce il gioco con lucidità, un faro che guida la squadra nei momenti cruciali.",
    ),
    (
        "clean tackle",
        "Interventi difensivi precisi con minimo rischio di fallo.",
        "Interviene con precisione chirurgica, un difensore che domina senza sbavature.",
    ),
    (
        "anticipation",
        "Ottima lettura del gioco con posizionamento anticipato.",
        "Legge il gioco in anticipo, un’intelligenza tattica che anticipa ogni mossa avversaria.",
    ),
    (
        "progressive carry",
        "Capace di avanzare il pallone con controllo in spazi ristretti.",
        "Avanza con controllo e visione, un motore che spinge la squadra verso l’attacco.",
    ),
    (
        "quick turn",
        "Eccellente agilità nei cambi di direzione sotto pressione.",
        "Si gira con agilità sotto pressione, un talento che crea spazi dove non ce ne sono.",
    ),
    (
        "line-breaking pass",
        "Passaggi verticali efficaci per superare le linee difensive.",
        "Trova linee di passaggio impossibili, un regista che spezza le difese con visione pura.",
    ),
    (
        "feint",
        "Abile nell’usare finte per superare il diretto avversario.",
        "Inganna con movimenti eleganti, un dribbling che lascia i difensori fuori posizione.",
    ),
];

/// Synonyms → canonical tags. Two-word keys are matched against adjacent tokens.
const BUILTIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("dribble", &["explosive dribbling"]),
    ("dribbles", &["explosive dribbling"]),
    ("dribbling", &["explosive dribbling"]),
    ("dribbler", &["explosive dribbling"]),
    ("explosive", &["explosive dribbling"]),
    ("acceleration", &["explosive dribbling"]),
    ("assist", &["final pass"]),
    ("assists", &["final pass"]),
    ("final pass", &["final pass"]),
    ("key pass", &["final pass"]),
    ("through ball", &["final pass", "line-breaking pass"]),
    ("calm", &["calm under pressure"]),
    ("composed", &["calm under pressure"]),
    ("composure", &["calm under pressure"]),
    ("under pressure", &["calm under pressure"]),
    ("tackle", &["clean tackle"]),
    ("tackles", &["clean tackle"]),
    ("tackling", &["clean tackle"]),
    ("interception", &["anticipation"]),
    ("interceptions", &["anticipation"]),
    ("reads", &["anticipation"]),
    ("positioning", &["anticipation"]),
    ("carry", &["progressive carry"]),
    ("carries", &["progressive carry"]),
    ("progressive", &["progressive carry"]),
    ("turn", &["quick turn"]),
    ("turns", &["quick turn"]),
    ("agility", &["quick turn"]),
    ("vertical pass", &["line-breaking pass"]),
    ("line breaking", &["line-breaking pass"]),
    ("vision", &["line-breaking pass"]),
    ("feint", &["feint"]),
    ("feints", &["feint"]),
    ("stepover", &["feint"]),
    ("stepovers", &["feint"]),
    ("skills", &["feint"]),
];

impl Vocabulary {
    /// The default vocabulary shipped with the service.
    pub fn builtin() -> Self {
        let tags = BUILTIN_TAGS
            .iter()
            .map(|&(id, technical, narrative)| {
                (
                    id.to_string(),
                    TagDescriptions {
                        technical: technical.to_string(),
                        narrative: narrative.to_string(),
                    },
                )
            })
            .collect();
        let keywords = BUILTIN_KEYWORDS
            .iter()
            .map(|&(keyword, targets)| {
                (
                    keyword.to_string(),
                    targets.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        Self { tags, keywords }
    }

    /// Builds a vocabulary from explicit maps, validating it.
    pub fn new(
        tags: IndexMap<String, TagDescriptions>,
        keywords: IndexMap<String, Vec<String>>,
    ) -> Result<Self, VocabularyError> {
        let vocabulary = Self { tags, keywords };
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Loads a vocabulary from a JSON file of shape
    /// `{"tags": {id: {technical, narrative}}, "keywords": {kw: [id]}}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, VocabularyError> {
        let parsed: Vocabulary = serde_json::from_str(raw)?;
        Self::new(parsed.tags, parsed.keywords)
    }

    fn validate(&self) -> Result<(), VocabularyError> {
        if self.tags.is_empty() {
            return Err(VocabularyError::Empty);
        }
        for (id, descriptions) in &self.tags {
            if descriptions.technical.trim().is_empty() || descriptions.narrative.trim().is_empty()
            {
                return Err(VocabularyError::EmptyDescription(id.clone()));
            }
        }
        for (keyword, targets) in &self.keywords {
            if let Some(unknown) = targets.iter().find(|t| !self.tags.contains_key(*t)) {
                return Err(VocabularyError::UnknownKeywordTarget {
                    keyword: keyword.clone(),
                    tag: unknown.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn lookup(&self, tag_id: &str) -> Option<&TagDescriptions> {
        self.tags.get(tag_id)
    }

    /// Canonical tag ids in vocabulary order.
    pub fn tag_ids(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Canonical tags a keyword (1-gram or space-joined 2-gram) maps to.
    pub fn keyword_targets(&self, keyword: &str) -> &[String] {
        self.keywords
            .get(keyword)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}
