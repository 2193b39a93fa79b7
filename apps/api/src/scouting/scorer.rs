//! Text scorer capability used by the external-model inference tier.
//!
//! The pipeline only sees `dyn TextScorer`. Backends:
//! - `LlmTextScorer`: asks Claude for per-token relevance scores.
//! - `BoundedScorer`: wraps any scorer with a deadline. The deadline belongs to
//!   whoever builds the scorer (see `main`), never to the pipeline itself.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::{LlmClient, LlmError};
use crate::scouting::prompts::{TOKEN_SCORE_PROMPT, TOKEN_SCORE_SYSTEM};

/// Relevance of one token of the input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenScore {
    pub token: String,
    pub score: f32,
}

#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("scorer timed out after {0:?}")]
    Timeout(Duration),

    #[error("scorer backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("scorer returned malformed output: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait TextScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<Vec<TokenScore>, ScorerError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmTextScorer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    scores: Vec<TokenScore>,
}

pub struct LlmTextScorer(pub LlmClient);

#[async_trait]
impl TextScorer for LlmTextScorer {
    async fn score(&self, text: &str) -> Result<Vec<TokenScore>, ScorerError> {
        let prompt = TOKEN_SCORE_PROMPT.replace("{report_text}", text);
        let response: ScoreResponse = self.0.call_json(&prompt, TOKEN_SCORE_SYSTEM).await?;
        validate_scores(response.scores)
    }
}

/// Rejects NaN or out-of-range scores; a model that emits them is not trusted.
fn validate_scores(scores: Vec<TokenScore>) -> Result<Vec<TokenScore>, ScorerError> {
    if let Some(bad) = scores
        .iter()
        .find(|s| !s.score.is_finite() || !(0.0..=1.0).contains(&s.score))
    {
        return Err(ScorerError::Malformed(format!(
            "score {} for token '{}' is outside 0.0..=1.0",
            bad.score, bad.token
        )));
    }
    Ok(scores)
}

// ────────────────────────────────────────────────────────────────────────────
// BoundedScorer
// ────────────────────────────────────────────────────────────────────────────

/// Applies a deadline to an inner scorer. A late answer counts as no answer.
pub struct BoundedScorer<S> {
    inner: S,
    timeout: Duration,
}

impl<S: TextScorer> BoundedScorer<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<S: TextScorer> TextScorer for BoundedScorer<S> {
    async fn score(&self, text: &str) -> Result<Vec<TokenScore>, ScorerError> {
        tokio::time::timeout(self.timeout, self.inner.score(text))
            .await
            .map_err(|_| ScorerError::Timeout(self.timeout))?
    }
}
