//! Upstream service clients
//!
//! Each external dependency sits behind a narrow trait: blob storage
//! uploads bytes and returns a public URL, transcription is a two-phase
//! submit + status poll, summarization turns transcript text into report
//! text. Production implementations speak HTTP via a shared reqwest
//! client; tests substitute in-memory doubles.

pub mod blob;
pub mod summarize;
pub mod transcribe;

pub use blob::{BlobStore, GcsBlobStore};
pub use summarize::{GeminiClient, Summarizer};
pub use transcribe::{
    AssemblyAiClient, JobUpdate, TranscriptionClient, TranscriptionResult, WhisperProxy,
};
