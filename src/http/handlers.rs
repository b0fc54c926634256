use super::state::AppState;
use crate::error::{Error, Result};
use crate::model::{JoinOutcome, Room, SpeakerUtterance, User, UserUpdate};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "emailAddresses", default)]
    pub email_addresses: Vec<EmailAddress>,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddress {
    #[serde(rename = "emailAddress")]
    pub email_address: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    #[serde(rename = "Login")]
    pub login: bool,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    /// Owner email, carried in the session field
    pub session: Option<String>,
    #[serde(rename = "roomName")]
    pub room_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub message: String,
    #[serde(rename = "roomID")]
    pub room_id: String,
    #[serde(rename = "qrCode")]
    pub qr_code: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    #[serde(rename = "roomId")]
    pub room_id: String,
    /// Joining user's email
    pub session: String,
}

/// Join state: "1" added, "2" already present ("0" is the not-found body)
#[derive(Debug, Serialize)]
pub struct JoinRoomResponse {
    pub message: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct JoinRoomNotFound {
    pub error: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
pub struct AudioUploadResponse {
    pub message: String,
    /// Public URL of the uploaded audio
    pub url: String,
    pub report_url: String,
    pub transcript: TranscriptPayload,
}

#[derive(Debug, Serialize)]
pub struct TranscriptPayload {
    pub text: String,
    pub speakers: Vec<SpeakerUtterance>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub transcript: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session
/// Session check; lazily creates the user on first sight
pub async fn session(
    State(state): State<AppState>,
    request: Option<Json<SessionRequest>>,
) -> Result<Json<SessionResponse>> {
    let email = request.and_then(|Json(req)| {
        req.user
            .and_then(|user| user.email_addresses.into_iter().next())
            .map(|address| address.email_address)
    });

    let Some(email) = email else {
        return Ok(Json(SessionResponse {
            message: "Login failed".to_string(),
            login: false,
            is_admin: false,
        }));
    };

    let status = state.users.ensure_user(&email).await?;

    Ok(Json(SessionResponse {
        message: if status.is_approved {
            "Login successful".to_string()
        } else {
            "User on waitlist".to_string()
        },
        login: status.is_approved,
        is_admin: status.is_admin,
    }))
}

/// GET /users
/// All users, for the admin panel
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users.list_users().await?))
}

/// PUT /users/:email
/// Update user permissions (admin)
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<MessageResponse>> {
    if update.is_empty() {
        return Err(Error::NoValidFields);
    }

    state.users.update_user(&email, &update).await?;

    Ok(Json(MessageResponse {
        message: "User updated successfully".to_string(),
    }))
}

/// POST /create-room
/// Create a new room with a join code
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>> {
    let (email, room_name) = match (request.session, request.room_name) {
        (Some(email), Some(name)) if !email.is_empty() && !name.is_empty() => (email, name),
        _ => return Err(Error::Validation("Missing required fields".to_string())),
    };

    let room = state.rooms.create_room(&email, &room_name).await?;

    Ok(Json(CreateRoomResponse {
        message: "Room created successfully".to_string(),
        room_id: room.room_id,
        qr_code: room.qr_code,
    }))
}

/// POST /join-room
/// Add a user to a room
pub async fn join_room(
    State(state): State<AppState>,
    Json(request): Json<JoinRoomRequest>,
) -> impl IntoResponse {
    match state.rooms.join_room(&request.room_id, &request.session).await {
        Ok(JoinOutcome::Joined) => (
            StatusCode::OK,
            Json(JoinRoomResponse {
                message: "Added to room".to_string(),
                state: "1".to_string(),
            }),
        )
            .into_response(),
        Ok(JoinOutcome::AlreadyMember) => (
            StatusCode::OK,
            Json(JoinRoomResponse {
                message: "Already in room".to_string(),
                state: "2".to_string(),
            }),
        )
            .into_response(),
        Err(Error::RoomNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(JoinRoomNotFound {
                error: "Room not found".to_string(),
                state: "0".to_string(),
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /rooms
/// All rooms, for the admin panel
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<Room>>> {
    Ok(Json(state.rooms.list_rooms().await?))
}

/// POST /audio
/// Upload room audio and drive it through the session pipeline
pub async fn upload_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AudioUploadResponse>> {
    let mut audio: Option<Vec<u8>> = None;
    let mut room_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Validation(e.to_string()))?;
                audio = Some(bytes.to_vec());
            }
            Some("roomId") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::Validation(e.to_string()))?;
                room_id = Some(value);
            }
            _ => {}
        }
    }

    let audio = audio.ok_or_else(|| Error::Validation("No audio file uploaded".to_string()))?;
    let room_id = room_id.ok_or_else(|| Error::Validation("Missing roomId".to_string()))?;

    info!(room_id = %room_id, bytes = audio.len(), "audio upload received");

    let cancel = state.shutdown.child_token();
    let record = state
        .pipeline
        .process_audio_upload(&room_id, audio, &cancel)
        .await?;

    Ok(Json(AudioUploadResponse {
        message: "Audio uploaded, transcribed, and report generated successfully".to_string(),
        url: record.audio_url,
        report_url: record.report_url,
        transcript: TranscriptPayload {
            text: record.full_text,
            speakers: record.speakers,
            status: "completed".to_string(),
        },
    }))
}

/// POST /transcribe
/// Proxy a single file to the external transcription endpoint
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>> {
    let mut file: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("upload.wav")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| Error::Validation(e.to_string()))?;
            file = Some((bytes.to_vec(), filename));
        }
    }

    let (bytes, filename) =
        file.ok_or_else(|| Error::Validation("No audio file provided".to_string()))?;

    let transcript = state.transcribe_proxy.transcribe(bytes, filename).await?;

    Ok(Json(TranscribeResponse { transcript }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
