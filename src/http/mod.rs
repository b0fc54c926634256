//! HTTP API server
//!
//! This module provides the JSON API for rooms, users, and audio uploads:
//! - POST /session - Session check, lazily creating the user
//! - GET /users, PUT /users/:email - Admin user listing and approval
//! - POST /create-room, POST /join-room, GET /rooms - Room lifecycle
//! - POST /audio - Audio upload driving the session pipeline
//! - POST /transcribe - Passthrough transcription
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
