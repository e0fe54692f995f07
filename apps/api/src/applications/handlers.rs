//! Axum route handlers for the Applications and Dashboard API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::models::{ApplicationStatus, ApplicationView, NewApplication};
use crate::applications::stats::{
    compute_dashboard_stats, pipeline_breakdown, DashboardStats, PipelineStage,
};
use crate::errors::AppError;
use crate::scoring::models::ScoreResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub struct ScoreApplicationRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreApplicationResponse {
    pub application: ApplicationView,
    pub result: ScoreResult,
}

/// GET /api/v1/applications?status=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
) -> Json<Vec<ApplicationView>> {
    let records = state.applications.list(filter.status).await;
    Json(records.into_iter().map(ApplicationView::from).collect())
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(request): Json<NewApplication>,
) -> Result<(StatusCode, Json<ApplicationView>), AppError> {
    let record = state.applications.create(request).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationView>, AppError> {
    state
        .applications
        .get(id)
        .await
        .map(|record| Json(record.into()))
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationView>, AppError> {
    let record = state.applications.update_status(id, request.status).await?;
    Ok(Json(record.into()))
}

/// POST /api/v1/applications/:id/fit-score
///
/// Scores the résumé against the JD and stores the fit score on the application.
pub async fn handle_score_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ScoreApplicationRequest>,
) -> Result<Json<ScoreApplicationResponse>, AppError> {
    // Fail fast on unknown ids before spending an embedding call.
    if state.applications.get(id).await.is_none() {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }

    let result = state
        .fit_scorer
        .score(&request.resume_text, &request.jd_text)
        .await;

    let application = state
        .applications
        .set_fit_score(id, result.analysis().fit_score)
        .await?;

    info!(
        %id,
        fit_score = application.fit_score,
        fallback = result.is_fallback(),
        "Application fit score updated"
    );

    Ok(Json(ScoreApplicationResponse {
        application: application.into(),
        result,
    }))
}

/// GET /api/v1/dashboard/stats
pub async fn handle_dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let applications = state.applications.list(None).await;
    Json(compute_dashboard_stats(&applications))
}

/// GET /api/v1/dashboard/pipeline
pub async fn handle_dashboard_pipeline(State(state): State<AppState>) -> Json<Vec<PipelineStage>> {
    let applications = state.applications.list(None).await;
    Json(pipeline_breakdown(&applications))
}
