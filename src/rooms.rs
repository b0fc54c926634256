use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::model::{JoinOutcome, Room};
use crate::report;
use crate::store::RoomStore;

/// Room lifecycle: creation (with join code), membership, admin listing.
pub struct RoomService {
    rooms: Arc<dyn RoomStore>,
}

impl RoomService {
    pub fn new(rooms: Arc<dyn RoomStore>) -> Self {
        Self { rooms }
    }

    /// Create a room owned by `owner_email`. The participant list starts
    /// as exactly the owner; the join code encodes the fresh room id.
    pub async fn create_room(&self, owner_email: &str, name: &str) -> Result<Room> {
        let room_id = uuid::Uuid::new_v4().to_string();
        let qr_code = report::room_code_png(&room_id)?;

        let room = Room {
            room_id: room_id.clone(),
            room_name: name.to_string(),
            email: owner_email.to_string(),
            participants: vec![owner_email.to_string()],
            qr_code,
            audio: Vec::new(),
            transcripts: Vec::new(),
        };

        self.rooms.insert_room(&room).await?;

        info!(room_id = %room_id, owner = owner_email, "room created");
        Ok(room)
    }

    /// Add a user to a room; joining twice is a no-op reported as
    /// `AlreadyMember`.
    pub async fn join_room(&self, room_id: &str, email: &str) -> Result<JoinOutcome> {
        self.rooms.join(room_id, email).await
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        self.rooms.list_rooms().await
    }
}
