// ── Guest store ──

use std::sync::Arc;

use frontdesk_api::{CmsClient, ListOptions};
use secrecy::SecretString;
use tracing::{info, warn};

use super::repository::Repository;
use crate::config::WritePolicy;
use crate::error::CoreError;
use crate::model::{Guest, GuestPatch, RecordId};
use crate::session::SessionSource;
use crate::stream::EntityStream;

const COLLECTION: &str = "guests";

/// Cached, observable view of the `guests` collection.
pub struct GuestStore {
    repo: Repository<Guest>,
    publish_on_create: bool,
}

impl GuestStore {
    pub fn new(
        client: CmsClient,
        session: Arc<dyn SessionSource>,
        service_token: SecretString,
        policy: WritePolicy,
    ) -> Self {
        Self {
            repo: Repository::new(COLLECTION, client, session, service_token, policy),
            publish_on_create: true,
        }
    }

    /// Whether `create` follows up with the publish action (on by default).
    pub fn with_publish_on_create(mut self, publish: bool) -> Self {
        self.publish_on_create = publish;
        self
    }

    pub fn write_policy(&self) -> WritePolicy {
        self.repo.policy()
    }

    /// Reload every guest from the API.
    ///
    /// Never fails: when the request fails the error is logged and the
    /// collection is emptied.
    pub async fn list(&self) -> Arc<Vec<Arc<Guest>>> {
        match self.repo.fetch(ListOptions::default()).await {
            Ok(guests) => self.repo.entries.replace_all(guests),
            Err(e) => {
                warn!(error = %e, "cannot load guests");
                self.repo.entries.replace_all(Vec::new());
            }
        }
        self.all()
    }

    /// Register a guest, append it, then publish it.
    ///
    /// A failed publish is logged; the guest still counts as created.
    pub async fn create(&self, guest: &GuestPatch) -> Result<Arc<Guest>, CoreError> {
        let created = self.repo.create(guest).await?;
        if self.publish_on_create {
            let token = self.repo.bearer();
            if let Err(e) = self
                .repo
                .client()
                .publish(COLLECTION, created.id.get(), &token)
                .await
            {
                warn!(id = %created.id, error = %e, "guest created but not published");
            }
        }
        Ok(created)
    }

    pub async fn update(&self, id: RecordId, patch: &GuestPatch) -> Result<Arc<Guest>, CoreError> {
        self.repo
            .update(id, patch)
            .await
            .map_err(|e| match e.status() {
                Some(404) => CoreError::GuestNotFound { id },
                _ => e,
            })
    }

    /// Mark the guest as checked out. Repeating it is harmless.
    pub async fn check_out(&self, guest: &Guest) -> Result<Arc<Guest>, CoreError> {
        let updated = self.update(guest.id, &GuestPatch::check_out()).await?;
        info!(id = %guest.id, fullname = %guest.fullname, "guest checked out");
        Ok(updated)
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn all(&self) -> Arc<Vec<Arc<Guest>>> {
        self.repo.entries.snapshot()
    }

    pub fn get(&self, id: RecordId) -> Option<Arc<Guest>> {
        self.repo.entries.get(id)
    }

    /// Guests currently assigned to `room_no`.
    pub fn in_room(&self, room_no: i64) -> Vec<Arc<Guest>> {
        self.all()
            .iter()
            .filter(|g| g.room_no == Some(room_no))
            .map(Arc::clone)
            .collect()
    }

    pub fn subscribe(&self) -> EntityStream<Guest> {
        EntityStream::new(self.repo.entries.subscribe())
    }
}
