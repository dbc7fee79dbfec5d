use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        // Profile
        .route("/save_user_data", post(handlers::save_user_data))
        .route("/profile", get(handlers::get_profile))
        // Recommendation flows
        .route("/recommendations", get(handlers::get_recommendations))
        .route("/related_videos", get(handlers::get_related_videos))
        // Watch progress
        .route("/video_details/:video_id", get(handlers::get_video_details))
        .route("/record_watch", post(handlers::record_watch))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
