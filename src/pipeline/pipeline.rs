use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::poll::{PollOutcome, PollPolicy};
use crate::clients::{BlobStore, JobUpdate, Summarizer, TranscriptionClient};
use crate::error::{Error, Result};
use crate::model::TranscriptRecord;
use crate::report::ReportRenderer;
use crate::store::RoomStore;

/// Coordinates one audio upload end to end.
///
/// All dependencies are injected at construction; nothing here talks to
/// the outside world except through the four client traits and the room
/// store. Failures leave prior persistent state untouched: the only
/// durable commit is the final transcript append.
pub struct SessionPipeline {
    rooms: Arc<dyn RoomStore>,
    blobs: Arc<dyn BlobStore>,
    transcriber: Arc<dyn TranscriptionClient>,
    summarizer: Arc<dyn Summarizer>,
    renderer: Arc<dyn ReportRenderer>,
    poll: PollPolicy,
}

impl SessionPipeline {
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        blobs: Arc<dyn BlobStore>,
        transcriber: Arc<dyn TranscriptionClient>,
        summarizer: Arc<dyn Summarizer>,
        renderer: Arc<dyn ReportRenderer>,
        poll: PollPolicy,
    ) -> Self {
        Self {
            rooms,
            blobs,
            transcriber,
            summarizer,
            renderer,
            poll,
        }
    }

    /// Process one audio upload for a room, producing a persisted
    /// transcript record or failing cleanly.
    ///
    /// A transcription or later failure leaves the already-uploaded audio
    /// blob in place; orphaned blobs are an accepted cost of keeping the
    /// append atomic.
    pub async fn process_audio_upload(
        &self,
        room_id: &str,
        audio: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<TranscriptRecord> {
        // Lookup first: an unknown room must cause zero external calls.
        let room = self
            .rooms
            .find_room(room_id)
            .await?
            .ok_or_else(|| Error::RoomNotFound(room_id.to_string()))?;

        info!(room_id, bytes = audio.len(), "processing audio upload");

        let audio_key = format!("audio/{room_id}.wav");
        let audio_url = with_cancel(
            cancel,
            self.blobs.put(&audio_key, audio.clone(), "audio/wav"),
        )
        .await?;

        let job_id = with_cancel(cancel, self.transcriber.submit(&audio)).await?;

        let transcription = self
            .poll
            .run(cancel, || {
                let transcriber = Arc::clone(&self.transcriber);
                let job_id = job_id.clone();
                async move {
                    match transcriber.status(&job_id).await? {
                        JobUpdate::Pending => Ok(PollOutcome::Pending),
                        JobUpdate::Completed(result) => Ok(PollOutcome::Ready(result)),
                        JobUpdate::Failed(detail) => {
                            warn!(job_id = %job_id, detail = %detail, "transcription job failed");
                            Err(Error::TranscriptionFailed(detail))
                        }
                    }
                }
            })
            .await?;

        info!(
            room_id,
            chars = transcription.text.len(),
            utterances = transcription.utterances.len(),
            "transcription completed"
        );

        let report_text = with_cancel(cancel, self.summarizer.summarize(&transcription.text)).await?;

        let report_pdf = self.renderer.render(&room.room_name, &report_text)?;

        let report_key = format!("reports/{}_{}_report.pdf", room_id, Utc::now().timestamp());
        let report_url = with_cancel(
            cancel,
            self.blobs.put(&report_key, report_pdf, "application/pdf"),
        )
        .await?;

        let record = TranscriptRecord {
            audio_url: audio_url.clone(),
            full_text: transcription.text,
            speakers: transcription.utterances,
            timestamp: Utc::now(),
            report_url,
        };

        // The single committal step: everything above was held in memory.
        self.rooms
            .append_transcript(room_id, &audio_url, &record)
            .await?;

        info!(room_id, "audio upload processed");
        Ok(record)
    }
}

/// Race a pipeline step against the caller's cancellation token.
async fn with_cancel<T>(
    cancel: &CancellationToken,
    step: impl Future<Output = Result<T>>,
) -> Result<T> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = step => result,
    }
}
