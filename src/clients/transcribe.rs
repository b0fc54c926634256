use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::config::TranscriptionConfig;
use crate::error::{Error, Result};
use crate::model::SpeakerUtterance;

/// Completed transcription: full text plus diarized utterances
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    pub text: String,
    pub utterances: Vec<SpeakerUtterance>,
}

/// One observation of a transcription job's state
#[derive(Debug, Clone)]
pub enum JobUpdate {
    /// Still queued or processing; poll again
    Pending,
    Completed(TranscriptionResult),
    /// The service gave up on the job
    Failed(String),
}

/// Two-phase transcription: submit audio for a job handle, then poll its
/// status until the service reports completion or error.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn submit(&self, audio: &[u8]) -> Result<String>;

    async fn status(&self, job_id: &str) -> Result<JobUpdate>;
}

// ============================================================================
// AssemblyAI wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    status: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    utterances: Option<Vec<UtteranceResponse>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UtteranceResponse {
    speaker: String,
    text: String,
    #[serde(default)]
    start: Option<u64>,
    #[serde(default)]
    end: Option<u64>,
}

impl From<UtteranceResponse> for SpeakerUtterance {
    fn from(u: UtteranceResponse) -> Self {
        SpeakerUtterance {
            speaker: u.speaker,
            text: u.text,
            start: u.start,
            end: u.end,
        }
    }
}

/// Transcription client speaking the AssemblyAI v2 protocol with speaker
/// diarization enabled.
pub struct AssemblyAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AssemblyAiClient {
    pub fn new(http: reqwest::Client, config: &TranscriptionConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl TranscriptionClient for AssemblyAiClient {
    async fn submit(&self, audio: &[u8]) -> Result<String> {
        // Phase 1: upload the raw bytes, receiving a service-internal URL
        let response = self
            .http
            .post(format!("{}/v2/upload", self.base_url))
            .header("authorization", &self.api_key)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::TranscriptionFailed(format!(
                "upload returned {status}: {detail}"
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        // Phase 2: request a diarized transcription job for that URL
        let response = self
            .http
            .post(format!("{}/v2/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&serde_json::json!({
                "audio_url": upload.upload_url,
                "speaker_labels": true,
            }))
            .send()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::TranscriptionFailed(format!(
                "job request returned {status}: {detail}"
            )));
        }

        let job: JobResponse = response
            .json()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        info!(job_id = %job.id, bytes = audio.len(), "transcription job submitted");
        Ok(job.id)
    }

    async fn status(&self, job_id: &str) -> Result<JobUpdate> {
        let response = self
            .http
            .get(format!("{}/v2/transcript/{}", self.base_url, job_id))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::TranscriptionFailed(format!(
                "status check returned {status}: {detail}"
            )));
        }

        let transcript: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        match transcript.status.as_str() {
            "completed" => Ok(JobUpdate::Completed(TranscriptionResult {
                text: transcript.text.unwrap_or_default(),
                utterances: transcript
                    .utterances
                    .unwrap_or_default()
                    .into_iter()
                    .map(SpeakerUtterance::from)
                    .collect(),
            })),
            "error" => Ok(JobUpdate::Failed(
                transcript
                    .error
                    .unwrap_or_else(|| "unspecified transcription error".to_string()),
            )),
            _ => Ok(JobUpdate::Pending),
        }
    }
}

/// Passthrough client for the /transcribe route: re-posts the uploaded
/// file to an external transcription endpoint and returns its text.
pub struct WhisperProxy {
    http: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    transcript: String,
}

impl WhisperProxy {
    pub fn new(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }

    pub async fn transcribe(&self, file: Vec<u8>, filename: String) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(file).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::TranscriptionFailed(format!(
                "proxy returned {}",
                response.status()
            )));
        }

        let body: ProxyResponse = response
            .json()
            .await
            .map_err(|e| Error::TranscriptionFailed(e.to_string()))?;
        Ok(body.transcript)
    }
}
