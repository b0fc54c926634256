// Integration tests for room lifecycle and user approval

mod common;

use std::sync::Arc;

use base64::Engine;
use common::{MemoryRoomStore, MemoryUserStore};
use mediscribe::error::Error;
use mediscribe::model::{JoinOutcome, UserUpdate};
use mediscribe::rooms::RoomService;
use mediscribe::store::{RoomStore, UserStore};

fn service() -> (Arc<MemoryRoomStore>, RoomService) {
    let store = Arc::new(MemoryRoomStore::default());
    let service = RoomService::new(Arc::clone(&store) as Arc<dyn RoomStore>);
    (store, service)
}

#[tokio::test]
async fn create_room_starts_with_owner_only() {
    let (store, service) = service();

    let room = service.create_room("a@x.com", "Standup").await.unwrap();

    assert_eq!(room.room_name, "Standup");
    assert_eq!(room.participants, vec!["a@x.com".to_string()]);
    assert!(room.audio.is_empty());
    assert!(room.transcripts.is_empty());

    // The join code is a real base64 PNG
    assert!(!room.qr_code.is_empty());
    let png = base64::engine::general_purpose::STANDARD
        .decode(&room.qr_code)
        .unwrap();
    assert_eq!(&png[1..4], b"PNG");

    // Persisted as created
    let stored = store.room(&room.room_id).unwrap();
    assert_eq!(stored.participants, room.participants);
}

#[tokio::test]
async fn joining_twice_is_idempotent() {
    let (store, service) = service();
    let room = service.create_room("owner@x.com", "Clinic").await.unwrap();

    let first = service.join_room(&room.room_id, "b@x.com").await.unwrap();
    assert_eq!(first, JoinOutcome::Joined);

    let second = service.join_room(&room.room_id, "b@x.com").await.unwrap();
    assert_eq!(second, JoinOutcome::AlreadyMember);

    // Second call left the participant list unchanged
    let stored = store.room(&room.room_id).unwrap();
    assert_eq!(
        stored.participants,
        vec!["owner@x.com".to_string(), "b@x.com".to_string()]
    );
}

#[tokio::test]
async fn owner_rejoining_is_already_member() {
    let (_, service) = service();
    let room = service.create_room("owner@x.com", "Clinic").await.unwrap();

    let outcome = service.join_room(&room.room_id, "owner@x.com").await.unwrap();
    assert_eq!(outcome, JoinOutcome::AlreadyMember);
}

#[tokio::test]
async fn joining_unknown_room_is_not_found() {
    let (_, service) = service();

    let result = service.join_room("no-such-room", "b@x.com").await;
    assert!(matches!(result, Err(Error::RoomNotFound(_))));
}

#[tokio::test]
async fn ensure_user_creates_unapproved_record_once() {
    let store = MemoryUserStore::default();

    let first = store.ensure_user("new@x.com").await.unwrap();
    assert!(!first.existed);
    assert!(!first.is_admin);
    assert!(!first.is_approved);

    let second = store.ensure_user("new@x.com").await.unwrap();
    assert!(second.existed);
    assert!(!second.is_approved);

    assert_eq!(store.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_with_no_valid_fields_changes_nothing() {
    let store = MemoryUserStore::default();
    store.ensure_user("a@x.com").await.unwrap();

    // A body like {"foo": 1} deserializes to an empty update
    let result = store.update_user("a@x.com", &UserUpdate::default()).await;
    assert!(matches!(result, Err(Error::NoValidFields)));

    let user = store.user("a@x.com").unwrap();
    assert!(!user.is_admin);
    assert!(!user.is_approved);
}

#[tokio::test]
async fn update_unknown_user_is_not_found() {
    let store = MemoryUserStore::default();

    let update = UserUpdate {
        is_approved: Some(true),
        is_admin: None,
    };
    let result = store.update_user("ghost@x.com", &update).await;
    assert!(matches!(result, Err(Error::UserNotFound(_))));
}

#[tokio::test]
async fn update_merges_only_provided_flags() {
    let store = MemoryUserStore::default();
    store.ensure_user("a@x.com").await.unwrap();

    store
        .update_user(
            "a@x.com",
            &UserUpdate {
                is_approved: Some(true),
                is_admin: None,
            },
        )
        .await
        .unwrap();

    let user = store.user("a@x.com").unwrap();
    assert!(user.is_approved);
    assert!(!user.is_admin);
}
