#![allow(dead_code)]

// In-memory doubles for the five external contracts, with call counters
// so tests can assert which upstream services were touched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mediscribe::clients::{
    BlobStore, JobUpdate, Summarizer, TranscriptionClient, TranscriptionResult,
};
use mediscribe::error::{Error, Result};
use mediscribe::model::{JoinOutcome, Room, SpeakerUtterance, TranscriptRecord, User, UserStatus, UserUpdate};
use mediscribe::pipeline::{PollPolicy, SessionPipeline};
use mediscribe::report::ReportRenderer;
use mediscribe::store::{RoomStore, UserStore};

#[derive(Default)]
pub struct MemoryRoomStore {
    pub rooms: Mutex<HashMap<String, Room>>,
}

impl MemoryRoomStore {
    pub fn with_room(room_id: &str) -> Self {
        let store = Self::default();
        store.rooms.lock().unwrap().insert(
            room_id.to_string(),
            Room {
                room_id: room_id.to_string(),
                room_name: "Consult".to_string(),
                email: "owner@x.com".to_string(),
                participants: vec!["owner@x.com".to_string()],
                qr_code: String::new(),
                audio: Vec::new(),
                transcripts: Vec::new(),
            },
        );
        store
    }

    pub fn room(&self, room_id: &str) -> Option<Room> {
        self.rooms.lock().unwrap().get(room_id).cloned()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn insert_room(&self, room: &Room) -> Result<()> {
        self.rooms
            .lock()
            .unwrap()
            .insert(room.room_id.clone(), room.clone());
        Ok(())
    }

    async fn find_room(&self, room_id: &str) -> Result<Option<Room>> {
        Ok(self.room(room_id))
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.rooms.lock().unwrap().values().cloned().collect())
    }

    async fn join(&self, room_id: &str, email: &str) -> Result<JoinOutcome> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| Error::RoomNotFound(room_id.to_string()))?;

        if room.participants.iter().any(|p| p == email) {
            return Ok(JoinOutcome::AlreadyMember);
        }
        room.participants.push(email.to_string());
        Ok(JoinOutcome::Joined)
    }

    async fn append_transcript(
        &self,
        room_id: &str,
        audio_url: &str,
        record: &TranscriptRecord,
    ) -> Result<()> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| Error::RoomNotFound(room_id.to_string()))?;

        room.audio.push(audio_url.to_string());
        room.transcripts.push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    pub users: Mutex<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn user(&self, email: &str) -> Option<User> {
        self.users.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ensure_user(&self, email: &str) -> Result<UserStatus> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get(email) {
            return Ok(UserStatus {
                existed: true,
                is_admin: user.is_admin,
                is_approved: user.is_approved,
            });
        }

        users.insert(
            email.to_string(),
            User {
                id: None,
                email: email.to_string(),
                is_admin: false,
                is_approved: false,
            },
        );
        Ok(UserStatus {
            existed: false,
            is_admin: false,
            is_approved: false,
        })
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn update_user(&self, email: &str, update: &UserUpdate) -> Result<()> {
        if update.is_empty() {
            return Err(Error::NoValidFields);
        }

        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(email)
            .ok_or_else(|| Error::UserNotFound(email.to_string()))?;

        if let Some(approved) = update.is_approved {
            user.is_approved = approved;
        }
        if let Some(admin) = update.is_admin {
            user.is_admin = admin;
        }
        Ok(())
    }
}

/// Blob store that fabricates URLs and counts uploads
#[derive(Default)]
pub struct CountingBlobStore {
    pub uploads: AtomicUsize,
}

#[async_trait]
impl BlobStore for CountingBlobStore {
    async fn put(&self, key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://blobs.test/{key}"))
    }
}

/// Transcriber that completes after a fixed number of status checks,
/// or reports a failed job.
pub struct ScriptedTranscriber {
    pub completes_after: usize,
    pub fails: bool,
    pub submits: AtomicUsize,
    pub status_checks: AtomicUsize,
}

impl ScriptedTranscriber {
    pub fn completing_after(checks: usize) -> Self {
        Self {
            completes_after: checks,
            fails: false,
            submits: AtomicUsize::new(0),
            status_checks: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            completes_after: 0,
            fails: true,
            submits: AtomicUsize::new(0),
            status_checks: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TranscriptionClient for ScriptedTranscriber {
    async fn submit(&self, _audio: &[u8]) -> Result<String> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        Ok("job-1".to_string())
    }

    async fn status(&self, _job_id: &str) -> Result<JobUpdate> {
        let check = self.status_checks.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fails {
            return Ok(JobUpdate::Failed("audio unintelligible".to_string()));
        }
        if check >= self.completes_after {
            return Ok(JobUpdate::Completed(TranscriptionResult {
                text: "Good morning. How are you feeling today?".to_string(),
                utterances: vec![
                    SpeakerUtterance {
                        speaker: "A".to_string(),
                        text: "Good morning.".to_string(),
                        start: Some(0),
                        end: Some(1200),
                    },
                    SpeakerUtterance {
                        speaker: "B".to_string(),
                        text: "How are you feeling today?".to_string(),
                        start: Some(1300),
                        end: Some(2900),
                    },
                ],
            }));
        }
        Ok(JobUpdate::Pending)
    }
}

pub struct StaticSummarizer {
    pub fails: bool,
    pub calls: AtomicUsize,
}

impl StaticSummarizer {
    pub fn ok() -> Self {
        Self {
            fails: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fails: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Summarizer for StaticSummarizer {
    async fn summarize(&self, _transcript: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fails {
            return Err(Error::SummarizationFailed("upstream said no".to_string()));
        }
        Ok("# Meeting Minutes\n\nDiscussed symptoms.\n* Follow up in two weeks\n".to_string())
    }
}

#[derive(Default)]
pub struct StubRenderer {
    pub renders: AtomicUsize,
}

impl ReportRenderer for StubRenderer {
    fn render(&self, _title: &str, _body: &str) -> Result<Vec<u8>> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        Ok(b"%PDF-1.4 stub".to_vec())
    }
}

/// Millisecond-scale poll schedule so tests finish quickly
pub fn fast_poll(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        base_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(4),
        backoff: 2.0,
        max_attempts,
    }
}

pub struct PipelineFixture {
    pub rooms: Arc<MemoryRoomStore>,
    pub blobs: Arc<CountingBlobStore>,
    pub transcriber: Arc<ScriptedTranscriber>,
    pub summarizer: Arc<StaticSummarizer>,
    pub renderer: Arc<StubRenderer>,
    pub pipeline: SessionPipeline,
}

pub fn pipeline_fixture(
    rooms: MemoryRoomStore,
    transcriber: ScriptedTranscriber,
    summarizer: StaticSummarizer,
    max_attempts: u32,
) -> PipelineFixture {
    let rooms = Arc::new(rooms);
    let blobs = Arc::new(CountingBlobStore::default());
    let transcriber = Arc::new(transcriber);
    let summarizer = Arc::new(summarizer);
    let renderer = Arc::new(StubRenderer::default());

    let pipeline = SessionPipeline::new(
        Arc::clone(&rooms) as Arc<dyn RoomStore>,
        Arc::clone(&blobs) as Arc<dyn BlobStore>,
        Arc::clone(&transcriber) as Arc<dyn TranscriptionClient>,
        Arc::clone(&summarizer) as Arc<dyn Summarizer>,
        Arc::clone(&renderer) as Arc<dyn ReportRenderer>,
        fast_poll(max_attempts),
    );

    PipelineFixture {
        rooms,
        blobs,
        transcriber,
        summarizer,
        renderer,
        pipeline,
    }
}
