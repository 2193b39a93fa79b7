//! Profile assembly — combines extraction, inference and insight rendering
//! into finalized `PlayerProfile` values.

use std::sync::Arc;

use indexmap::IndexSet;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{
    default_birth_year, plausible_birth_year, PlayerProfile, ProfileSource, Rank, UNKNOWN,
};
use crate::scouting::extractor::{extract, parse_shorthand, ExtractMode};
use crate::scouting::inference::{infer_tags, Inference, InferenceSettings, InferenceTier};
use crate::scouting::insight::{render, InsightStyle};
use crate::scouting::scorer::TextScorer;
use crate::scouting::vocabulary::Vocabulary;

/// Everything the pipeline needs, built once at startup and cloned into handlers.
#[derive(Clone)]
pub struct Scouting {
    pub vocabulary: Arc<Vocabulary>,
    pub scorer: Option<Arc<dyn TextScorer>>,
    pub settings: InferenceSettings,
}

/// A freshly analyzed profile plus the tier that produced its tags.
#[derive(Debug, Clone)]
pub struct AnalyzedReport {
    pub profile: PlayerProfile,
    pub tier: InferenceTier,
}

/// Tags as typed in a form: either a list or a single comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for TagsInput {
    fn default() -> Self {
        TagsInput::List(Vec::new())
    }
}

impl TagsInput {
    /// Trimmed, non-empty, de-duplicated tags in input order.
    pub fn normalize(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            TagsInput::List(items) => items.iter().map(String::as_str).collect(),
            TagsInput::Csv(text) => text.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Manual-entry form. Every field is optional; blanks fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManualProfileForm {
    pub name: Option<String>,
    pub country: Option<String>,
    pub year: Option<i32>,
    pub role: Option<String>,
    pub club: Option<String>,
    pub video: Option<String>,
    pub context: Option<String>,
    #[serde(default)]
    pub tags: TagsInput,
    pub source: Option<String>,
    pub rank: Option<Rank>,
    pub insight: Option<String>,
    #[serde(default)]
    pub style: InsightStyle,
}

/// Optional extras a quick-add can carry next to the shorthand line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuickAddExtras {
    pub club: Option<String>,
    pub video: Option<String>,
    pub context: Option<String>,
    pub rank: Option<Rank>,
    #[serde(default)]
    pub style: InsightStyle,
}

impl Scouting {
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        scorer: Option<Arc<dyn TextScorer>>,
        settings: InferenceSettings,
    ) -> Self {
        Self {
            vocabulary,
            scorer,
            settings,
        }
    }

    pub async fn infer(&self, text: &str) -> Inference {
        infer_tags(text, self.scorer.as_deref(), &self.vocabulary, &self.settings).await
    }

    pub fn render_insight<S: AsRef<str>>(&self, tags: &[S], style: InsightStyle) -> String {
        render(tags, style, &self.vocabulary)
    }

    /// Raw report → finalized profile. Extraction and inference are independent
    /// branches over the same text. Extraction is pure and runs first, so
    /// malformed shorthand aborts before the model tier is ever called.
    pub async fn analyze_report(
        &self,
        text: &str,
        mode: ExtractMode,
        source: ProfileSource,
        style: InsightStyle,
    ) -> Result<AnalyzedReport, AppError> {
        let fields = extract(text, mode)?;
        let inference = self.infer(text).await;

        info!(
            "Analyzed report: name={}, tags={}, tier={:?}",
            fields.name,
            inference.tags.len(),
            inference.tier
        );

        let insight = self.render_insight(&inference.tags, style);
        let profile = PlayerProfile {
            name: fields.name,
            country: fields.country,
            birth_year: fields.birth_year,
            role: fields.role,
            club: None,
            video: fields.video,
            context: fields.context,
            tags: inference.tags,
            source: source.label().to_string(),
            rank: Rank::default(),
            insight,
        };

        Ok(AnalyzedReport {
            profile,
            tier: inference.tier,
        })
    }

    /// Strict `name, country, year, role` entry. Tags come from the context,
    /// when there is any.
    pub async fn quick_add(
        &self,
        shorthand: &str,
        extras: QuickAddExtras,
    ) -> Result<AnalyzedReport, AppError> {
        let fields = parse_shorthand(shorthand)?;
        let context = non_blank(extras.context).or(fields.context);

        let inference = match context.as_deref() {
            Some(text) => self.infer(text).await,
            None => Inference::empty(),
        };
        let insight = self.render_insight(&inference.tags, extras.style);

        Ok(AnalyzedReport {
            profile: PlayerProfile {
                name: fields.name,
                country: fields.country,
                birth_year: fields.birth_year,
                role: fields.role,
                club: non_blank(extras.club),
                video: non_blank(extras.video),
                context,
                tags: inference.tags,
                source: ProfileSource::QuickAdd.label().to_string(),
                rank: extras.rank.unwrap_or_default(),
                insight,
            },
            tier: inference.tier,
        })
    }

    /// Manual-entry form → finalized profile.
    pub fn build_manual_profile(&self, form: ManualProfileForm) -> PlayerProfile {
        let tags = form.tags.normalize();
        let insight =
            non_blank(form.insight).unwrap_or_else(|| self.render_insight(&tags, form.style));

        PlayerProfile {
            name: or_unknown(form.name),
            country: or_unknown(form.country),
            birth_year: form
                .year
                .and_then(plausible_birth_year)
                .unwrap_or_else(default_birth_year),
            role: or_unknown(form.role),
            club: non_blank(form.club),
            video: non_blank(form.video),
            context: non_blank(form.context),
            tags,
            source: non_blank(form.source)
                .unwrap_or_else(|| ProfileSource::ManualEntry.label().to_string()),
            rank: form.rank.unwrap_or_default(),
            insight,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn or_unknown(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::scouting::insight::NO_INSIGHT;
    use crate::scouting::scorer::{ScorerError, TokenScore};

    fn scouting() -> Scouting {
        Scouting::new(
            Arc::new(Vocabulary::builtin()),
            None,
            InferenceSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_analyze_free_text_post() {
        let post = "Jane Doe, Brazil winger with explosive dribble and a final pass assist";
        let report = scouting()
            .analyze_report(
                post,
                ExtractMode::FreeText,
                ProfileSource::ParsedReport,
                InsightStyle::Technical,
            )
            .await
            .unwrap();
        let profile = report.profile;
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.country, "Brazil");
        assert_eq!(profile.role, "Winger");
        assert_eq!(report.tier, InferenceTier::Keyword);
        assert_eq!(profile.tags[0], "explosive dribbling");
        assert!(profile.tags.contains(&"final pass".to_string()));
        assert!(profile
            .insight
            .starts_with("Efficace in dribbling nello stretto"));
        assert_eq!(profile.source, "Parsed Report");
        assert_eq!(profile.rank, Rank::Tattico);
    }

    #[tokio::test]
    async fn test_analyze_malformed_shorthand_aborts() {
        let err = scouting()
            .analyze_report(
                "Jane Doe, Brazil",
                ExtractMode::Shorthand,
                ProfileSource::ParsedReport,
                InsightStyle::Narrative,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedReport(_)));
    }

    struct CountingScorer(AtomicUsize);

    #[async_trait]
    impl TextScorer for CountingScorer {
        async fn score(&self, _text: &str) -> Result<Vec<TokenScore>, ScorerError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec![TokenScore {
                token: "pressing".into(),
                score: 0.9,
            }])
        }
    }

    #[tokio::test]
    async fn test_malformed_shorthand_never_calls_the_scorer() {
        let scorer = Arc::new(CountingScorer(AtomicUsize::new(0)));
        let scouting = Scouting::new(
            Arc::new(Vocabulary::builtin()),
            Some(scorer.clone()),
            InferenceSettings::default(),
        );

        let err = scouting
            .analyze_report(
                "Jane Doe, pressing",
                ExtractMode::Shorthand,
                ProfileSource::ParsedReport,
                InsightStyle::Narrative,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedReport(_)));
        assert_eq!(scorer.0.load(Ordering::SeqCst), 0);

        let report = scouting
            .analyze_report(
                "Jane Doe, Brazil, 2009, Winger, pressing",
                ExtractMode::Shorthand,
                ProfileSource::ParsedReport,
                InsightStyle::Narrative,
            )
            .await
            .unwrap();
        assert_eq!(scorer.0.load(Ordering::SeqCst), 1);
        assert_eq!(report.tier, InferenceTier::Model);
        assert_eq!(report.profile.tags, vec!["skill_pressing"]);
    }

    #[tokio::test]
    async fn test_quick_add_without_context_uses_placeholder() {
        let report = scouting()
            .quick_add("Jane Doe, Brazil, 2009, Winger", QuickAddExtras::default())
            .await
            .unwrap();
        assert_eq!(report.profile.birth_year, 2009);
        assert!(report.profile.tags.is_empty());
        assert_eq!(report.profile.insight, NO_INSIGHT);
        assert_eq!(report.profile.source, "Quick Add");
    }

    #[tokio::test]
    async fn test_quick_add_infers_from_context() {
        let extras = QuickAddExtras {
            context: Some("clean tackle and great anticipation".into()),
            rank: Some(Rank::Predatore),
            ..Default::default()
        };
        let report = scouting()
            .quick_add("Tom Ruiz, Spain, 2010, Defender", extras)
            .await
            .unwrap();
        assert_eq!(report.profile.rank, Rank::Predatore);
        assert!(report.profile.tags.contains(&"clean tackle".to_string()));
        assert!(report.profile.tags.contains(&"anticipation".to_string()));
    }

    #[tokio::test]
    async fn test_quick_add_rejects_short_line() {
        let err = scouting()
            .quick_add("Tom Ruiz, Spain", QuickAddExtras::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedReport(_)));
    }

    #[test]
    fn test_manual_profile_defaults() {
        let profile = scouting().build_manual_profile(ManualProfileForm::default());
        assert_eq!(profile.name, UNKNOWN);
        assert_eq!(profile.country, UNKNOWN);
        assert_eq!(profile.birth_year, default_birth_year());
        assert_eq!(profile.source, "Manual Entry");
        assert_eq!(profile.rank, Rank::Tattico);
        assert_eq!(profile.insight, NO_INSIGHT);
        assert!(profile.club.is_none());
    }

    #[test]
    fn test_manual_profile_csv_tags_are_normalized() {
        let form = ManualProfileForm {
            name: Some("Jane Doe".into()),
            tags: TagsInput::Csv(" feint, , quick turn,feint ".into()),
            style: InsightStyle::Technical,
            ..Default::default()
        };
        let profile = scouting().build_manual_profile(form);
        assert_eq!(profile.tags, vec!["feint", "quick turn"]);
        assert!(profile.insight.starts_with("Abile nell’usare finte"));
    }

    #[test]
    fn test_manual_profile_implausible_year_defaults() {
        for year in [1, 3000, -40] {
            let form = ManualProfileForm {
                name: Some("Jane Doe".into()),
                year: Some(year),
                ..Default::default()
            };
            let profile = scouting().build_manual_profile(form);
            assert_eq!(profile.birth_year, default_birth_year(), "year {year}");
        }
    }

    #[test]
    fn test_manual_profile_keeps_a_plausible_year() {
        let form = ManualProfileForm {
            year: Some(2008),
            ..Default::default()
        };
        assert_eq!(scouting().build_manual_profile(form).birth_year, 2008);
    }

    #[test]
    fn test_manual_profile_keeps_user_insight() {
        let form = ManualProfileForm {
            tags: TagsInput::List(vec!["feint".into()]),
            insight: Some("Seen live twice, very promising.".into()),
            ..Default::default()
        };
        let profile = scouting().build_manual_profile(form);
        assert_eq!(profile.insight, "Seen live twice, very promising.");
    }

    #[test]
    fn test_tags_input_deserializes_both_shapes() {
        let csv: TagsInput = serde_json::from_str(r#""feint, quick turn""#).unwrap();
        let list: TagsInput = serde_json::from_str(r#"["feint", "quick turn"]"#).unwrap();
        assert_eq!(csv.normalize(), list.normalize());
    }
}
