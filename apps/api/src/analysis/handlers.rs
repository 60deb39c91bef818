//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::analysis::history::{classify_and_score, ClassifiedContent, DEFAULT_TREND_LIMIT};
use crate::analysis::models::{
    AnalysisHistoryRecord, AttractivenessPoint, CategoryInfo, CharmCategory, EmotionTrend,
    GeneratedOutput, HistoryPatch, UserAnalyticsSummary,
};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub points: Vec<AttractivenessPoint>,
}

#[derive(Debug, Deserialize)]
pub struct RecordAnalysisRequest {
    pub user_id: String,
    pub user_input: String,
    pub output: GeneratedOutput,
    #[serde(default)]
    pub session_duration_seconds: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHistoryRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub patch: HistoryPatch,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub limit: Option<usize>,
}

fn require_user(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    Ok(())
}

fn record_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("history record {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/analysis/categories
pub async fn handle_categories() -> Json<Vec<CategoryInfo>> {
    Json(CharmCategory::ALL.iter().map(CharmCategory::info).collect())
}

/// POST /api/v1/analysis/classify
pub async fn handle_classify(Json(request): Json<ClassifyRequest>) -> Json<ClassifiedContent> {
    Json(classify_and_score(&request.points))
}

/// POST /api/v1/analysis/history
pub async fn handle_record_analysis(
    State(state): State<AppState>,
    Json(request): Json<RecordAnalysisRequest>,
) -> Result<(StatusCode, Json<AnalysisHistoryRecord>), AppError> {
    require_user(&request.user_id)?;
    if !request.session_duration_seconds.is_finite() || request.session_duration_seconds < 0.0 {
        return Err(AppError::Validation(
            "session_duration_seconds must be a non-negative number".to_string(),
        ));
    }

    let record = state
        .history
        .record_analysis(
            &request.user_id,
            &request.user_input,
            request.output,
            request.session_duration_seconds,
        )
        .await;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/analysis/history?user_id=…
pub async fn handle_list_history(
    State(state): State<AppState>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<Vec<AnalysisHistoryRecord>>, AppError> {
    require_user(&owner.user_id)?;
    Ok(Json(state.history.list(&owner.user_id).await))
}

/// GET /api/v1/analysis/history/:id?user_id=…
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<AnalysisHistoryRecord>, AppError> {
    require_user(&owner.user_id)?;
    state
        .history
        .get_record(&owner.user_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| record_not_found(&id))
}

/// PATCH /api/v1/analysis/history/:id
pub async fn handle_update_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateHistoryRequest>,
) -> Result<Json<AnalysisHistoryRecord>, AppError> {
    require_user(&request.user_id)?;
    request.patch.validate().map_err(AppError::Validation)?;

    state
        .history
        .update_record(&request.user_id, &id, &request.patch)
        .await?
        .map(Json)
        .ok_or_else(|| record_not_found(&id))
}

/// DELETE /api/v1/analysis/history/:id?user_id=…
pub async fn handle_delete_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(owner): Query<OwnerQuery>,
) -> Result<StatusCode, AppError> {
    require_user(&owner.user_id)?;
    if state.history.delete_record(&owner.user_id, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(record_not_found(&id))
    }
}

/// GET /api/v1/analysis/users/:user_id/summary
pub async fn handle_user_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserAnalyticsSummary>, AppError> {
    require_user(&user_id)?;
    Ok(Json(
        state.history.get_user_analytics(&user_id, Utc::now()).await,
    ))
}

/// GET /api/v1/analysis/users/:user_id/emotion-trends?limit=…
pub async fn handle_emotion_trends(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<TrendQuery>,
) -> Result<Json<Vec<EmotionTrend>>, AppError> {
    require_user(&user_id)?;
    let limit = params.limit.unwrap_or(DEFAULT_TREND_LIMIT);
    Ok(Json(state.history.emotion_trends(&user_id, limit).await))
}
