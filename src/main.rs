use std::sync::Arc;

use anyhow::{Context, Result};
use mediscribe::clients::{AssemblyAiClient, GcsBlobStore, GeminiClient, WhisperProxy};
use mediscribe::pipeline::{PollPolicy, SessionPipeline};
use mediscribe::report::PdfRenderer;
use mediscribe::rooms::RoomService;
use mediscribe::store::{MongoRoomStore, MongoUserStore, RoomStore, UserStore};
use mediscribe::{create_router, AppState, Config};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cfg = Config::load("config/mediscribe").context("Failed to load configuration")?;

    info!("mediscribe v0.1.0");
    info!(
        "HTTP server will bind to {}:{}",
        cfg.service.bind, cfg.service.port
    );

    let mongo = mongodb::Client::with_uri_str(&cfg.store.uri)
        .await
        .context("Failed to connect to document store")?;
    let db = mongo.database(&cfg.store.database);

    let rooms: Arc<dyn RoomStore> = Arc::new(MongoRoomStore::new(&db));
    let users: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(&db));

    let http = reqwest::Client::new();
    let pipeline = Arc::new(SessionPipeline::new(
        Arc::clone(&rooms),
        Arc::new(GcsBlobStore::new(http.clone(), &cfg.blob)),
        Arc::new(AssemblyAiClient::new(http.clone(), &cfg.transcription)),
        Arc::new(GeminiClient::new(http.clone(), &cfg.summarization)),
        Arc::new(PdfRenderer),
        PollPolicy::from_config(&cfg.pipeline),
    ));

    let shutdown = CancellationToken::new();
    let state = AppState {
        rooms: Arc::new(RoomService::new(rooms)),
        users,
        pipeline,
        transcribe_proxy: Arc::new(WhisperProxy::new(
            http,
            cfg.transcription.proxy_url.clone(),
        )),
        shutdown: shutdown.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.bind, cfg.service.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await
        .context("HTTP server error")?;

    Ok(())
}
