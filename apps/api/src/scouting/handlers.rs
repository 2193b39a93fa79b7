//! Axum route handlers for the Scouting API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::{demo_profiles, PlayerProfile, ProfileSource};
use crate::scouting::analyze::{AnalyzedReport, ManualProfileForm, QuickAddExtras};
use crate::scouting::dedup::{find_duplicate, DuplicateProfileWarning};
use crate::scouting::export::{filter_profiles, to_markdown, ProfileFilter};
use crate::scouting::extractor::ExtractMode;
use crate::scouting::inference::InferenceTier;
use crate::scouting::insight::InsightStyle;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub mode: ExtractMode,
    #[serde(default)]
    pub style: InsightStyle,
}

#[derive(Debug, Deserialize)]
pub struct SearchResultRequest {
    pub snippet: String,
    pub title: Option<String>,
    #[serde(default)]
    pub style: InsightStyle,
}

/// Preview of a parsed report. Not persisted; the client confirms via
/// `POST /api/v1/profiles`.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub profile: PlayerProfile,
    pub tier: InferenceTier,
    pub duplicate: Option<DuplicateProfileWarning>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestTagsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestTagsResponse {
    pub tags: Vec<String>,
    pub tier: InferenceTier,
}

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub style: InsightStyle,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

#[derive(Debug, Deserialize)]
pub struct QuickAddRequest {
    pub report: String,
    #[serde(flatten)]
    pub extras: QuickAddExtras,
}

#[derive(Debug, Serialize)]
pub struct SavedProfileResponse {
    pub index: usize,
    pub profile: PlayerProfile,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<PlayerProfile>,
    pub total: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

async fn preview(state: &AppState, report: AnalyzedReport) -> Result<AnalyzeResponse, AppError> {
    let existing = state.store.list().await?;
    let duplicate = find_duplicate(&report.profile, &existing);
    Ok(AnalyzeResponse {
        profile: report.profile,
        tier: report.tier,
        duplicate,
    })
}

/// POST /api/v1/reports/analyze
///
/// Parses a pasted post or report into a profile preview.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_text("text", &request.text)?;

    let report = state
        .scouting
        .analyze_report(
            &request.text,
            request.mode,
            ProfileSource::ParsedReport,
            request.style,
        )
        .await?;

    Ok(Json(preview(&state, report).await?))
}

/// POST /api/v1/reports/search-result
///
/// Same as analyze, for a search-result snippet scraped by the client.
pub async fn handle_search_result(
    State(state): State<AppState>,
    Json(request): Json<SearchResultRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_text("snippet", &request.snippet)?;

    let text = match request.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => format!("{title}. {}", request.snippet),
        _ => request.snippet.clone(),
    };

    let report = state
        .scouting
        .analyze_report(
            &text,
            ExtractMode::FreeText,
            ProfileSource::SearchResult,
            request.style,
        )
        .await?;

    Ok(Json(preview(&state, report).await?))
}

/// POST /api/v1/tags/suggest
pub async fn handle_suggest_tags(
    State(state): State<AppState>,
    Json(request): Json<SuggestTagsRequest>,
) -> Json<SuggestTagsResponse> {
    let inference = state.scouting.infer(&request.text).await;
    Json(SuggestTagsResponse {
        tags: inference.tags,
        tier: inference.tier,
    })
}

/// POST /api/v1/insights
///
/// Renders a fresh insight for the given tags; nothing is stored.
pub async fn handle_insight(
    State(state): State<AppState>,
    Json(request): Json<InsightRequest>,
) -> Json<InsightResponse> {
    let tags: Vec<&str> = request
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    Json(InsightResponse {
        insight: state.scouting.render_insight(&tags, request.style),
    })
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(
    State(state): State<AppState>,
    Query(filter): Query<ProfileFilter>,
) -> Result<Json<ProfileListResponse>, AppError> {
    let all = state.store.list().await?;
    let profiles: Vec<PlayerProfile> = filter_profiles(&all, &filter).into_iter().cloned().collect();
    Ok(Json(ProfileListResponse {
        total: all.len(),
        profiles,
    }))
}

/// POST /api/v1/profiles
///
/// Manual entry. Rejected with 409 when it duplicates a stored profile.
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(form): Json<ManualProfileForm>,
) -> Result<(StatusCode, Json<SavedProfileResponse>), AppError> {
    let profile = state.scouting.build_manual_profile(form);
    let index = state.store.append(profile.clone()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SavedProfileResponse { index, profile }),
    ))
}

/// POST /api/v1/profiles/quick-add
///
/// Strict `name, country, year, role` entry; 422 when fields are missing.
pub async fn handle_quick_add(
    State(state): State<AppState>,
    Json(request): Json<QuickAddRequest>,
) -> Result<(StatusCode, Json<SavedProfileResponse>), AppError> {
    let report = state
        .scouting
        .quick_add(&request.report, request.extras)
        .await?;
    let index = state.store.append(report.profile.clone()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SavedProfileResponse {
            index,
            profile: report.profile,
        }),
    ))
}

/// DELETE /api/v1/profiles/:index
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, AppError> {
    state.store.remove(index).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profiles/demo
///
/// Replaces the stored list with the demo profiles.
pub async fn handle_load_demo(
    State(state): State<AppState>,
) -> Result<Json<ProfileListResponse>, AppError> {
    let profiles = demo_profiles();
    state.store.replace_all(profiles.clone()).await?;
    Ok(Json(ProfileListResponse {
        total: profiles.len(),
        profiles,
    }))
}

/// GET /api/v1/profiles/export
pub async fn handle_export(
    State(state): State<AppState>,
    Query(filter): Query<ProfileFilter>,
) -> Result<impl IntoResponse, AppError> {
    let all = state.store.list().await?;
    let selected: Vec<PlayerProfile> = filter_profiles(&all, &filter).into_iter().cloned().collect();
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"talents.md\"",
            ),
        ],
        to_markdown(&selected),
    ))
}
