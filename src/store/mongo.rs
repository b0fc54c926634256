use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{RoomStore, UserStore};
use crate::error::{Error, Result};
use crate::model::{JoinOutcome, Room, TranscriptRecord, User, UserStatus, UserUpdate};

/// Internal user document; the store-assigned ObjectId never leaves this
/// module unstringified.
#[derive(Debug, Serialize, Deserialize)]
struct UserDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    email: String,
    #[serde(rename = "isAdmin")]
    is_admin: bool,
    #[serde(rename = "isApproved")]
    is_approved: bool,
}

impl From<UserDoc> for User {
    fn from(doc: UserDoc) -> Self {
        User {
            id: doc.id.map(|oid| oid.to_hex()),
            email: doc.email,
            is_admin: doc.is_admin,
            is_approved: doc.is_approved,
        }
    }
}

pub struct MongoRoomStore {
    rooms: Collection<Room>,
}

impl MongoRoomStore {
    pub fn new(db: &Database) -> Self {
        Self {
            rooms: db.collection("Rooms"),
        }
    }
}

#[async_trait]
impl RoomStore for MongoRoomStore {
    async fn insert_room(&self, room: &Room) -> Result<()> {
        self.rooms.insert_one(room).await?;
        info!(room_id = %room.room_id, "room created");
        Ok(())
    }

    async fn find_room(&self, room_id: &str) -> Result<Option<Room>> {
        Ok(self.rooms.find_one(doc! { "roomID": room_id }).await?)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        let cursor = self.rooms.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn join(&self, room_id: &str, email: &str) -> Result<JoinOutcome> {
        // Guarded push: matches only when the user is not yet a participant,
        // so concurrent joins cannot duplicate membership.
        let result = self
            .rooms
            .update_one(
                doc! { "roomID": room_id, "participants": { "$ne": email } },
                doc! { "$push": { "participants": email } },
            )
            .await?;

        if result.matched_count == 1 {
            info!(room_id, email, "participant added");
            return Ok(JoinOutcome::Joined);
        }

        // No match: the room is either absent or the user already joined.
        match self.find_room(room_id).await? {
            Some(_) => Ok(JoinOutcome::AlreadyMember),
            None => Err(Error::RoomNotFound(room_id.to_string())),
        }
    }

    async fn append_transcript(
        &self,
        room_id: &str,
        audio_url: &str,
        record: &TranscriptRecord,
    ) -> Result<()> {
        let record = mongodb::bson::to_bson(record).map_err(|e| Error::Store(e.to_string()))?;

        let result = self
            .rooms
            .update_one(
                doc! { "roomID": room_id },
                doc! { "$push": { "audio": audio_url, "transcripts": record } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::RoomNotFound(room_id.to_string()));
        }

        info!(room_id, "transcript record appended");
        Ok(())
    }
}

pub struct MongoUserStore {
    users: Collection<UserDoc>,
}

impl MongoUserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection("Users"),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn ensure_user(&self, email: &str) -> Result<UserStatus> {
        // Atomic upsert: returning the pre-image tells us whether the
        // record existed without a separate read.
        let before = self
            .users
            .find_one_and_update(
                doc! { "email": email },
                doc! { "$setOnInsert": {
                    "email": email,
                    "isAdmin": false,
                    "isApproved": false,
                } },
            )
            .upsert(true)
            .return_document(ReturnDocument::Before)
            .await?;

        match before {
            Some(user) => Ok(UserStatus {
                existed: true,
                is_admin: user.is_admin,
                is_approved: user.is_approved,
            }),
            None => {
                info!(email, "user created on first session check");
                Ok(UserStatus {
                    existed: false,
                    is_admin: false,
                    is_approved: false,
                })
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let cursor = self.users.find(doc! {}).await?;
        let docs: Vec<UserDoc> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, email: &str, update: &UserUpdate) -> Result<()> {
        let mut set = Document::new();
        if let Some(approved) = update.is_approved {
            set.insert("isApproved", approved);
        }
        if let Some(admin) = update.is_admin {
            set.insert("isAdmin", admin);
        }
        if set.is_empty() {
            return Err(Error::NoValidFields);
        }

        let result = self
            .users
            .update_one(doc! { "email": email }, doc! { "$set": set })
            .await?;

        if result.matched_count == 0 {
            return Err(Error::UserNotFound(email.to_string()));
        }

        info!(email, "user flags updated");
        Ok(())
    }
}
