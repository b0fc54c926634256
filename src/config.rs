use anyhow::Result;
use serde::Deserialize;

/// Service configuration, loaded from an optional TOML file with
/// environment overrides (`MEDISCRIBE__SECTION__KEY`). Credentials for the
/// upstream services have no defaults; a missing key fails startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    pub store: StoreConfig,
    pub blob: BlobConfig,
    pub transcription: TranscriptionConfig,
    pub summarization: SummarizationConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "defaults::bind")]
    pub bind: String,
    #[serde(default = "defaults::port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Document store connection string
    pub uri: String,
    #[serde(default = "defaults::database")]
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    pub bucket: String,
    /// Bearer token for the storage API
    pub token: String,
    #[serde(default = "defaults::blob_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    pub api_key: String,
    #[serde(default = "defaults::transcription_base_url")]
    pub base_url: String,
    /// Upstream endpoint for the passthrough /transcribe route
    #[serde(default = "defaults::transcription_proxy_url")]
    pub proxy_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizationConfig {
    pub api_key: String,
    #[serde(default = "defaults::summarization_base_url")]
    pub base_url: String,
    #[serde(default = "defaults::summarization_model")]
    pub model: String,
}

/// Transcription poll bounds. The base interval matches the upstream
/// service's suggested cadence; backoff keeps long jobs from hammering the
/// status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "defaults::poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "defaults::poll_max_interval_secs")]
    pub poll_max_interval_secs: u64,
    #[serde(default = "defaults::poll_backoff")]
    pub poll_backoff: f64,
    #[serde(default = "defaults::poll_max_attempts")]
    pub poll_max_attempts: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
            port: defaults::port(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: defaults::poll_interval_secs(),
            poll_max_interval_secs: defaults::poll_max_interval_secs(),
            poll_backoff: defaults::poll_backoff(),
            poll_max_attempts: defaults::poll_max_attempts(),
        }
    }
}

mod defaults {
    pub fn bind() -> String {
        "0.0.0.0".to_string()
    }
    pub fn port() -> u16 {
        8000
    }
    pub fn database() -> String {
        "MediScript".to_string()
    }
    pub fn blob_base_url() -> String {
        "https://storage.googleapis.com".to_string()
    }
    pub fn transcription_base_url() -> String {
        "https://api.assemblyai.com".to_string()
    }
    pub fn transcription_proxy_url() -> String {
        "https://api.whisper.ai/transcribe".to_string()
    }
    pub fn summarization_base_url() -> String {
        "https://api.gemini.com/v1/generate".to_string()
    }
    pub fn summarization_model() -> String {
        "gemini-2.0-flash".to_string()
    }
    pub fn poll_interval_secs() -> u64 {
        5
    }
    pub fn poll_max_interval_secs() -> u64 {
        60
    }
    pub fn poll_backoff() -> f64 {
        2.0
    }
    pub fn poll_max_attempts() -> u32 {
        60
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MEDISCRIBE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
