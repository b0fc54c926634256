//! Document store contracts
//!
//! Rooms and users live in a document store behind two narrow traits so
//! the pipeline and HTTP layer can run against test doubles. Membership
//! joins and transcript appends are atomic conditional updates in the
//! contract itself; callers never read-modify-write a room.

mod mongo;

pub use mongo::{MongoRoomStore, MongoUserStore};

use crate::error::Result;
use crate::model::{JoinOutcome, Room, TranscriptRecord, User, UserStatus, UserUpdate};

#[async_trait::async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist a freshly created room
    async fn insert_room(&self, room: &Room) -> Result<()>;

    /// Look up a room by its public identifier
    async fn find_room(&self, room_id: &str) -> Result<Option<Room>>;

    /// Unfiltered dump for administrative consumption
    async fn list_rooms(&self) -> Result<Vec<Room>>;

    /// Append `email` to the participant list unless already present.
    ///
    /// Must be atomic with respect to concurrent joins for the same room.
    /// Fails with `RoomNotFound` if the room does not exist.
    async fn join(&self, room_id: &str, email: &str) -> Result<JoinOutcome>;

    /// Append a completed transcript record and its audio URL to the room.
    ///
    /// This is the pipeline's single committal step: append-if-room-exists,
    /// atomic with respect to concurrent appends for the same room.
    async fn append_transcript(
        &self,
        room_id: &str,
        audio_url: &str,
        record: &TranscriptRecord,
    ) -> Result<()>;
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Return the user's flags, creating an unapproved, non-admin record
    /// on first sight.
    async fn ensure_user(&self, email: &str) -> Result<UserStatus>;

    /// Unfiltered dump for administrative consumption
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Merge the recognized fields into an existing record.
    ///
    /// Fails with `NoValidFields` when the update carries nothing, and
    /// `UserNotFound` when no record matches.
    async fn update_user(&self, email: &str, update: &UserUpdate) -> Result<()>;
}
