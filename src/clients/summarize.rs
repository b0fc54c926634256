use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SummarizationConfig;
use crate::error::{Error, Result};

/// Turns transcript text into structured report text
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String>;
}

/// The fixed report prompt: meeting minutes plus clinical notes, with
/// headers and bullet points the renderer knows how to classify.
pub fn report_prompt(transcript: &str) -> String {
    format!(
        "Based on the following medical conversation transcript, generate:\n\
         1. Meeting Minutes including:\n\
            - Date and time\n\
            - Key discussion points\n\
            - Action items\n\
            - Decisions made\n\
         \n\
         2. Medical Notes including:\n\
            - Patient symptoms/conditions discussed\n\
            - Diagnoses mentioned\n\
            - Treatment recommendations\n\
            - Follow-up actions\n\
         \n\
         Transcript:\n\
         {transcript}\n\
         \n\
         Please format the response in clear sections with headers and bullet points."
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    output: Option<String>,
}

/// Summarization client posting the report prompt to a Gemini-shaped
/// generation endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: &SummarizationConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, transcript: &str) -> Result<String> {
        let prompt = report_prompt(transcript);

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&GenerateRequest {
                input: &prompt,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| Error::SummarizationFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::SummarizationFailed(format!(
                "generation returned {status}: {detail}"
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::SummarizationFailed(e.to_string()))?;

        let output = body
            .output
            .ok_or_else(|| Error::SummarizationFailed("response carried no output".to_string()))?;

        info!(chars = output.len(), "report text generated");
        Ok(output)
    }
}
