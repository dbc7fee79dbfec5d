use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{ScoredVideo, UserProfile, VideoCandidate};
use crate::services::scoring;

use super::AppState;

// Request/Response types

/// Client-reported playback event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWatchRequest {
    pub video_id: Option<String>,
    pub watched_time: Option<f64>,
    pub duration: Option<f64>,
}

/// Cumulative progress returned after each watch event
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchResponse {
    pub video_id: String,
    pub total_time: f64,
    pub duration: f64,
    pub percentage: f64,
}

/// Data backing the single-video detail view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetailResponse {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub duration: f64,
    pub total_time: f64,
}

// Handlers

/// Service descriptor for the home route
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Overwrites the process-wide user profile (last write wins)
pub async fn save_user_data(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Json<UserProfile> {
    let mut inner = state.inner.write().await;
    inner.profile = profile;
    Json(inner.profile.clone())
}

/// Current profile, backing the confirmation view
pub async fn get_profile(State(state): State<AppState>) -> Json<UserProfile> {
    let inner = state.inner.read().await;
    Json(inner.profile.clone())
}

/// Recommendation pipeline: search by interest keywords, fetch details,
/// rank. Provider failures and empty keyword sets degrade to an empty list.
pub async fn get_recommendations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ScoredVideo>>> {
    let (keywords, candidates) = fetch_candidates(&state).await;
    let ranked = scoring::rank_candidates(&candidates, &keywords, state.embedder.as_ref())?;
    Ok(Json(ranked))
}

/// Same pipeline without scoring: the unranked candidate list
pub async fn get_related_videos(State(state): State<AppState>) -> Json<Vec<VideoCandidate>> {
    let (_, candidates) = fetch_candidates(&state).await;
    Json(candidates)
}

/// Detail view for one video, merged with its watch record.
///
/// Unlike the list flows, provider transport errors propagate here; an
/// empty lookup is a 404.
pub async fn get_video_details(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<VideoDetailResponse>> {
    let candidates = state.provider.fetch_details(&[video_id.clone()]).await?;
    let video = candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let record = {
        let inner = state.inner.read().await;
        inner.watch_tracker.get(&video_id)
    };

    Ok(Json(VideoDetailResponse {
        video_id: video.id,
        title: video.title,
        thumbnail: video.thumbnail,
        duration: video.duration_seconds,
        total_time: record.total_watched_seconds,
    }))
}

/// Accumulates a watch event; missing id or watched time is a client error
pub async fn record_watch(
    State(state): State<AppState>,
    Json(request): Json<RecordWatchRequest>,
) -> AppResult<Json<WatchResponse>> {
    let mut inner = state.inner.write().await;
    let record = inner.watch_tracker.record_watch(
        request.video_id.as_deref(),
        request.watched_time,
        request.duration,
    )?;

    // Validation passed, so the id is present
    let video_id = request.video_id.unwrap_or_default();

    Ok(Json(WatchResponse {
        video_id,
        total_time: record.total_watched_seconds,
        duration: record.duration_seconds,
        percentage: record.percentage,
    }))
}

/// Shared search-then-details step for the list flows.
///
/// Empty results are a valid, renderable state: provider errors are logged
/// and presented as an empty candidate set rather than propagated.
async fn fetch_candidates(state: &AppState) -> (Vec<String>, Vec<VideoCandidate>) {
    let keywords = {
        let inner = state.inner.read().await;
        inner.profile.keywords()
    };

    if keywords.is_empty() {
        return (keywords, Vec::new());
    }

    let ids = match state.provider.search_videos(&keywords).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(error = %e, provider = state.provider.name(), "Video search failed");
            return (keywords, Vec::new());
        }
    };

    if ids.is_empty() {
        return (keywords, Vec::new());
    }

    match state.provider.fetch_details(&ids).await {
        Ok(candidates) => (keywords, candidates),
        Err(e) => {
            tracing::warn!(error = %e, provider = state.provider.name(), "Detail fetch failed");
            (keywords, Vec::new())
        }
    }
}
