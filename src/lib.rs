pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod rooms;
pub mod store;

pub use clients::{
    AssemblyAiClient, BlobStore, GcsBlobStore, GeminiClient, JobUpdate, Summarizer,
    TranscriptionClient, TranscriptionResult, WhisperProxy,
};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{create_router, AppState};
pub use model::{JoinOutcome, Room, SpeakerUtterance, TranscriptRecord, User, UserStatus, UserUpdate};
pub use pipeline::{PollOutcome, PollPolicy, SessionPipeline};
pub use report::{PdfRenderer, ReportRenderer};
pub use rooms::RoomService;
pub use store::{MongoRoomStore, MongoUserStore, RoomStore, UserStore};
