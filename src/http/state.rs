use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::clients::WhisperProxy;
use crate::pipeline::SessionPipeline;
use crate::rooms::RoomService;
use crate::store::UserStore;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RoomService>,
    pub users: Arc<dyn UserStore>,
    pub pipeline: Arc<SessionPipeline>,
    pub transcribe_proxy: Arc<WhisperProxy>,

    /// Cancelled on shutdown; handlers derive per-request tokens from it
    /// so in-flight pipeline work stops with the server.
    pub shutdown: CancellationToken,
}
