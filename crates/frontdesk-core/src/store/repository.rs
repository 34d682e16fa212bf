// ── Shared store plumbing ──
//
// One content-API collection mirrored into one `EntityCollection`. The
// guest and room stores wrap this and add their own operations.

use std::sync::Arc;

use frontdesk_api::{CmsClient, ListOptions};
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use super::auth_header::BearerResolver;
use super::collection::EntityCollection;
use crate::config::WritePolicy;
use crate::error::CoreError;
use crate::model::{Patch, Record, RecordId};
use crate::session::SessionSource;

pub(crate) struct Repository<T: Record> {
    name: &'static str,
    client: CmsClient,
    bearer: BearerResolver,
    pub(crate) entries: EntityCollection<T>,
    policy: WritePolicy,
    /// Applied to every record the server returns before it is cached.
    normalize: fn(T) -> T,
}

impl<T> Repository<T>
where
    T: Record + DeserializeOwned,
{
    pub(crate) fn new(
        name: &'static str,
        client: CmsClient,
        session: Arc<dyn SessionSource>,
        service_token: SecretString,
        policy: WritePolicy,
    ) -> Self {
        Self {
            name,
            client,
            bearer: BearerResolver::new(session, service_token),
            entries: EntityCollection::new(),
            policy,
            normalize: std::convert::identity,
        }
    }

    pub(crate) fn with_normalize(mut self, normalize: fn(T) -> T) -> Self {
        self.normalize = normalize;
        self
    }

    pub(crate) fn policy(&self) -> WritePolicy {
        self.policy
    }

    pub(crate) fn client(&self) -> &CmsClient {
        &self.client
    }

    pub(crate) fn bearer(&self) -> SecretString {
        self.bearer.resolve()
    }

    /// Fetch the server set. Leaves the cache alone; callers decide what a
    /// failure means for them.
    pub(crate) async fn fetch(&self, options: ListOptions) -> Result<Vec<T>, CoreError> {
        let token = self.bearer.resolve();
        let page = self
            .client
            .list_with::<T>(self.name, &token, options)
            .await?;
        debug!(
            collection = self.name,
            count = page.data.len(),
            total = page.pagination.map(|p| p.total),
            "fetched collection"
        );
        Ok(page.data.into_iter().map(self.normalize).collect())
    }

    /// POST a new record and append the server's copy.
    pub(crate) async fn create<B>(&self, body: &B) -> Result<Arc<T>, CoreError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let token = self.bearer.resolve();
        match self.client.create::<T, B>(self.name, body, &token).await {
            Ok(record) => {
                let record = self.entries.push((self.normalize)(record));
                info!(collection = self.name, id = %record.id(), "created");
                Ok(record)
            }
            Err(e) => {
                error!(collection = self.name, error = %e, "create failed");
                Err(e.into())
            }
        }
    }

    /// PUT a patch; on success the server's copy replaces the cached one.
    pub(crate) async fn update<P>(&self, id: RecordId, patch: &P) -> Result<Arc<T>, CoreError>
    where
        P: Patch<T>,
    {
        self.update_with(id, patch, |record| patch.apply_to(record))
            .await
    }

    /// Like [`update`](Self::update), with a custom local edit for the
    /// optimistic fallback.
    pub(crate) async fn update_with<B, F>(
        &self,
        id: RecordId,
        body: &B,
        local: F,
    ) -> Result<Arc<T>, CoreError>
    where
        B: Serialize + Sync + ?Sized,
        F: FnOnce(&mut T) + Send,
    {
        let token = self.bearer.resolve();
        let err = match self
            .client
            .update::<T, B>(self.name, id.get(), body, &token)
            .await
        {
            Ok(record) => {
                let record = Arc::new((self.normalize)(record));
                if !self.entries.replace(Arc::clone(&record)) {
                    debug!(collection = self.name, %id, "updated record not cached");
                }
                return Ok(record);
            }
            Err(e) => CoreError::from(e),
        };

        match self.policy {
            WritePolicy::Strict => {
                error!(collection = self.name, %id, error = %err, "update failed");
                Err(err)
            }
            WritePolicy::Optimistic => match self.entries.modify(id, local) {
                Some(record) => {
                    warn!(
                        collection = self.name,
                        %id,
                        error = %err,
                        "update failed, keeping local change"
                    );
                    Ok(record)
                }
                None => {
                    error!(collection = self.name, %id, error = %err, "update failed");
                    Err(err)
                }
            },
        }
    }
}
