pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::scouting::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Report parsing
        .route("/api/v1/reports/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/reports/search-result",
            post(handlers::handle_search_result),
        )
        .route("/api/v1/tags/suggest", post(handlers::handle_suggest_tags))
        .route("/api/v1/insights", post(handlers::handle_insight))
        // Profiles
        .route(
            "/api/v1/profiles",
            get(handlers::handle_list_profiles).post(handlers::handle_create_profile),
        )
        .route(
            "/api/v1/profiles/quick-add",
            post(handlers::handle_quick_add),
        )
        .route("/api/v1/profiles/demo", post(handlers::handle_load_demo))
        .route("/api/v1/profiles/export", get(handlers::handle_export))
        .route(
            "/api/v1/profiles/:index",
            delete(handlers::handle_delete_profile),
        )
        .with_state(state)
}
