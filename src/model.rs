use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named collaborative session grouping participants, audio artifacts,
/// and transcripts.
///
/// Field names follow the persisted document layout, so the same struct
/// serves as the store schema and the admin API payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Opaque unique identifier (UUID v4)
    #[serde(rename = "roomID")]
    pub room_id: String,

    /// Display name
    #[serde(rename = "roomName")]
    pub room_name: String,

    /// Owning user's email
    pub email: String,

    /// Participant emails; always contains the owner
    pub participants: Vec<String>,

    /// Base64-encoded PNG encoding the room identifier
    #[serde(rename = "qrCode")]
    pub qr_code: String,

    /// Public URLs of uploaded audio artifacts
    #[serde(default)]
    pub audio: Vec<String>,

    /// Completed transcription + report results, append-only
    #[serde(default)]
    pub transcripts: Vec<TranscriptRecord>,
}

/// One completed transcription + report result attached to a room.
///
/// Appended only after transcription, summarization, and rendering all
/// succeed; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Public URL of the source audio blob
    pub audio_url: String,

    /// Full transcript text
    pub full_text: String,

    /// Diarized utterances, in spoken order
    pub speakers: Vec<SpeakerUtterance>,

    /// When the record was created
    pub timestamp: DateTime<Utc>,

    /// Public URL of the rendered PDF report
    pub report_url: String,
}

/// A single diarized utterance, passed through from the transcription
/// service. Timing fields are opaque to this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerUtterance {
    pub speaker: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
}

/// A user record keyed by email. Created lazily on first session check
/// with both flags false; mutated only via explicit admin update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, stringified for admin listings
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub email: String,

    #[serde(rename = "isAdmin")]
    pub is_admin: bool,

    #[serde(rename = "isApproved")]
    pub is_approved: bool,
}

/// Result of a join-room request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The user was appended to the participant list
    Joined,
    /// The user was already a participant; no mutation occurred
    AlreadyMember,
}

/// Flags returned by the lazy user lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStatus {
    /// Whether a record existed before this call
    pub existed: bool,
    pub is_admin: bool,
    pub is_approved: bool,
}

/// Admin-settable user fields. Unrecognized request fields are dropped by
/// serde, so a body with none of these present is rejected as having no
/// valid fields.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(rename = "isApproved")]
    pub is_approved: Option<bool>,

    #[serde(rename = "isAdmin")]
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.is_approved.is_none() && self.is_admin.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_serializes_with_document_field_names() {
        let room = Room {
            room_id: "r-1".to_string(),
            room_name: "Standup".to_string(),
            email: "a@x.com".to_string(),
            participants: vec!["a@x.com".to_string()],
            qr_code: "cXI=".to_string(),
            audio: vec![],
            transcripts: vec![],
        };

        let json = serde_json::to_string(&room).unwrap();
        assert!(json.contains("\"roomID\":\"r-1\""));
        assert!(json.contains("\"roomName\":\"Standup\""));
        assert!(json.contains("\"qrCode\""));

        let back: Room = serde_json::from_str(&json).unwrap();
        assert_eq!(back.room_id, "r-1");
        assert_eq!(back.participants, vec!["a@x.com".to_string()]);
    }

    #[test]
    fn room_tolerates_missing_lists() {
        // Documents written before a field existed deserialize with empty lists
        let json = r#"{
            "roomID": "r-2",
            "roomName": "Review",
            "email": "b@x.com",
            "participants": ["b@x.com"],
            "qrCode": ""
        }"#;

        let room: Room = serde_json::from_str(json).unwrap();
        assert!(room.audio.is_empty());
        assert!(room.transcripts.is_empty());
    }

    #[test]
    fn user_update_recognizes_only_known_fields() {
        let update: UserUpdate = serde_json::from_str(r#"{"foo": 1}"#).unwrap();
        assert!(update.is_empty());

        let update: UserUpdate = serde_json::from_str(r#"{"isApproved": true}"#).unwrap();
        assert!(!update.is_empty());
        assert_eq!(update.is_approved, Some(true));
        assert_eq!(update.is_admin, None);
    }

    #[test]
    fn utterance_timing_is_optional() {
        let json = r#"{"speaker": "A", "text": "hello"}"#;
        let u: SpeakerUtterance = serde_json::from_str(json).unwrap();
        assert_eq!(u.speaker, "A");
        assert_eq!(u.start, None);

        // Timing round-trips when present
        let json = r#"{"speaker": "B", "text": "hi", "start": 100, "end": 900}"#;
        let u: SpeakerUtterance = serde_json::from_str(json).unwrap();
        assert_eq!(u.end, Some(900));
    }
}
