use crate::{
    config::ServiceAccount,
    error::Error,
    obs::MetricsSink,
    store::{Collection, DocumentCollection, EntryStore, adapter::StoreCore},
    types::{Entry, EntryId, OwnerId, PlayerName, Sample},
};
use async_trait::async_trait;
use std::{path::Path, sync::Arc};
use tracing::info;

///
/// AdminStore
///
/// Elevated adapter: holds a verified service account and has full access
/// to the collection. Construct once at process start and share it; never
/// hand it, or the account, to untrusted callers.
///

pub struct AdminStore {
    core: StoreCore,
}

impl AdminStore {
    /// Connect to `collection` after re-checking the account's key material.
    pub fn connect(account: &ServiceAccount, collection: Arc<dyn Collection>) -> Result<Self, Error> {
        let account = account.clone().checked()?;

        info!(
            project = %account.project_id,
            client = %account.client_email,
            "admin store connected"
        );

        Ok(Self {
            core: StoreCore::new(collection, account.project_id),
        })
    }

    /// Connect to the account project's document file under `data_dir`.
    pub fn open_documents(account: &ServiceAccount, data_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let collection = DocumentCollection::open(data_dir, &account.project_id)?;

        Self::connect(account, Arc::new(collection))
    }

    /// Report every operation to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.core.set_sink(sink);
        self
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        self.core.project_id()
    }
}

#[async_trait]
impl EntryStore for AdminStore {
    async fn create(
        &self,
        owner_id: OwnerId,
        owner_name: PlayerName,
        sample: Sample,
    ) -> Result<EntryId, Error> {
        self.core.create(owner_id, owner_name, sample).await
    }

    async fn list_all(&self) -> Result<Vec<Entry>, Error> {
        self.core.list_all().await
    }

    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Entry>, Error> {
        self.core.list_by_owner(owner_id).await
    }

    async fn update(&self, id: EntryId, sample: Sample) -> Result<(), Error> {
        self.core.update(id, sample).await
    }

    async fn delete(&self, id: EntryId) -> Result<(), Error> {
        self.core.delete(id).await
    }
}
