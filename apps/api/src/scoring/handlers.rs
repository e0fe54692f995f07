//! Axum route handlers for the Scoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::embedding::ProviderStatus;
use crate::scoring::market::{market_trends, MarketTrends};
use crate::scoring::models::{MatchQuality, ScoreResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FitScoreRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct FitScoreResponse {
    pub result: ScoreResult,
    pub match_quality: MatchQuality,
    pub match_label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct MarketTrendsRequest {
    #[serde(default)]
    pub job_titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoringStatusResponse {
    pub provider: ProviderStatus,
    pub model: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/fit-score
///
/// Always answers 200: empty texts and embedding outages come back as
/// `mode: "fallback"` rather than as an error.
pub async fn handle_fit_score(
    State(state): State<AppState>,
    Json(request): Json<FitScoreRequest>,
) -> Json<FitScoreResponse> {
    let result = state
        .fit_scorer
        .score(&request.resume_text, &request.jd_text)
        .await;
    let match_quality = MatchQuality::from_score(result.analysis().fit_score);

    Json(FitScoreResponse {
        result,
        match_quality,
        match_label: match_quality.label(),
    })
}

/// POST /api/v1/market-trends
pub async fn handle_market_trends(Json(request): Json<MarketTrendsRequest>) -> Json<MarketTrends> {
    Json(market_trends(&request.job_titles))
}

/// GET /api/v1/scoring/status
pub async fn handle_scoring_status(State(state): State<AppState>) -> Json<ScoringStatusResponse> {
    Json(ScoringStatusResponse {
        provider: state.fit_scorer.provider_status(),
        model: state.config.embedding.model.clone(),
    })
}
