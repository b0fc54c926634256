use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session / users
        .route("/session", post(handlers::session))
        .route("/users", get(handlers::list_users))
        .route("/users/:email", put(handlers::update_user))
        // Rooms
        .route("/create-room", post(handlers::create_room))
        .route("/join-room", post(handlers::join_room))
        .route("/rooms", get(handlers::list_rooms))
        // Audio pipeline
        .route("/audio", post(handlers::upload_audio))
        .route("/transcribe", post(handlers::transcribe))
        // Recorded audio runs to minutes; the default 2MB limit is far too low
        .layer(DefaultBodyLimit::max(64 * 1024 * 1024))
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
