// ── Room store ──

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use frontdesk_api::{CmsClient, ListOptions};
use secrecy::SecretString;
use tracing::{info, warn};

use super::repository::Repository;
use crate::config::WritePolicy;
use crate::error::CoreError;
use crate::model::{Guest, RecordId, Room, RoomPatch};
use crate::session::SessionSource;
use crate::stream::EntityStream;

const COLLECTION: &str = "rooms";

/// The room list gets its own short timeout and one retry.
const LIST_OPTIONS: ListOptions = ListOptions {
    timeout: Some(Duration::from_secs(10)),
    retries: 1,
};

/// Cached, observable view of the `rooms` collection.
pub struct RoomStore {
    repo: Repository<Room>,
}

impl RoomStore {
    pub fn new(
        client: CmsClient,
        session: Arc<dyn SessionSource>,
        service_token: SecretString,
        policy: WritePolicy,
    ) -> Self {
        Self {
            repo: Repository::new(COLLECTION, client, session, service_token, policy)
                .with_normalize(Room::with_default_price),
        }
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.repo.policy()
    }

    /// Reload every room from the API. Missing prices are filled in from
    /// the room type, here and on every write result.
    ///
    /// Never fails. When the request fails or returns no rooms, a
    /// placeholder room number 2 is added unless one is already cached.
    pub async fn list(&self) -> Arc<Vec<Arc<Room>>> {
        match self.repo.fetch(LIST_OPTIONS).await {
            Ok(rooms) if !rooms.is_empty() => self.repo.entries.replace_all(rooms),
            Ok(_) => {
                warn!("content API returned no rooms");
                self.repo.entries.replace_all(Vec::new());
                self.add_backup_room();
            }
            Err(e) => {
                warn!(error = %e, "cannot load rooms");
                self.add_backup_room();
            }
        }
        self.all()
    }

    pub async fn update(&self, id: RecordId, patch: &RoomPatch) -> Result<Arc<Room>, CoreError> {
        self.repo.update(id, patch).await
    }

    /// Mark room `room_no` occupied by `guest`.
    ///
    /// Occupancy and the guest link go out in one request. An unknown room
    /// number is an error and leaves the cache untouched.
    pub async fn occupy(&self, room_no: i64, guest: &Guest) -> Result<Arc<Room>, CoreError> {
        let room = self
            .by_number(room_no)
            .ok_or(CoreError::RoomNotFound { room_no })?;

        let patch = RoomPatch::occupy(guest.id);
        let linked = Box::new(guest.clone());
        let updated = self
            .repo
            .update_with(room.id, &patch, move |r| {
                r.occupied = Some(true);
                r.guest = Some(linked);
            })
            .await?;
        info!(room_no, guest = %guest.id, "room occupied");
        Ok(updated)
    }

    /// Mark room `room_no` free and unlink its guest.
    ///
    /// `Ok(None)` when no room has that number.
    pub async fn vacate(&self, room_no: i64) -> Result<Option<Arc<Room>>, CoreError> {
        let Some(room) = self.by_number(room_no) else {
            warn!(room_no, "vacate: no such room");
            return Ok(None);
        };
        let updated = self.repo.update(room.id, &RoomPatch::vacate()).await?;
        info!(room_no, "room vacated");
        Ok(Some(updated))
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn all(&self) -> Arc<Vec<Arc<Room>>> {
        self.repo.entries.snapshot()
    }

    /// Rooms not known to be occupied. Unknown occupancy counts as free.
    pub fn available_rooms(&self) -> Vec<Arc<Room>> {
        self.all()
            .iter()
            .filter(|r| r.is_available())
            .map(Arc::clone)
            .collect()
    }

    pub fn get(&self, id: RecordId) -> Option<Arc<Room>> {
        self.repo.entries.get(id)
    }

    pub fn by_number(&self, room_no: i64) -> Option<Arc<Room>> {
        self.repo.entries.find(|r| r.room_no == room_no)
    }

    pub fn subscribe(&self) -> EntityStream<Room> {
        EntityStream::new(self.repo.entries.subscribe())
    }

    fn add_backup_room(&self) {
        if self.by_number(2).is_none() {
            let backup = self.repo.entries.push(Room::backup(Utc::now()));
            info!(id = %backup.id, "added placeholder room 2");
        }
    }
}
