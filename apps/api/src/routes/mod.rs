pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::scoring::handlers as scoring;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring API
        .route("/api/v1/fit-score", post(scoring::handle_fit_score))
        .route("/api/v1/market-trends", post(scoring::handle_market_trends))
        .route("/api/v1/scoring/status", get(scoring::handle_scoring_status))
        // Applications API
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id/fit-score",
            post(applications::handle_score_application),
        )
        // Dashboard API
        .route(
            "/api/v1/dashboard/stats",
            get(applications::handle_dashboard_stats),
        )
        .route(
            "/api/v1/dashboard/pipeline",
            get(applications::handle_dashboard_pipeline),
        )
        .with_state(state)
}
