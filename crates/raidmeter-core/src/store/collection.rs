use crate::{
    error::Error,
    types::{Entry, EntryId, EntryRecord, Sample, Timestamp},
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

///
/// Collection
///
/// Raw document storage keyed by store-assigned ids. Implementations do not
/// order, filter, or enforce access; the adapters do.
///

#[async_trait]
pub trait Collection: Send + Sync {
    /// Store a new document and assign its id.
    async fn insert(&self, record: EntryRecord) -> Result<EntryId, Error>;

    /// Overwrite `damages` and `timestamp`; `false` when the id is absent.
    async fn update(
        &self,
        id: EntryId,
        damages: Sample,
        timestamp: Timestamp,
    ) -> Result<bool, Error>;

    /// Delete a document; `false` when the id is absent.
    async fn remove(&self, id: EntryId) -> Result<bool, Error>;

    /// Every document, in no particular order.
    async fn scan(&self) -> Result<Vec<(EntryId, EntryRecord)>, Error>;
}

///
/// MemoryCollection
/// In-process collection; contents vanish with the process.
///

#[derive(Debug, Default)]
pub struct MemoryCollection {
    rows: RwLock<BTreeMap<EntryId, EntryRecord>>,
}

impl MemoryCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn insert(&self, record: EntryRecord) -> Result<EntryId, Error> {
        let id = EntryId::generate()?;
        self.rows.write().await.insert(id, record);

        Ok(id)
    }

    async fn update(
        &self,
        id: EntryId,
        damages: Sample,
        timestamp: Timestamp,
    ) -> Result<bool, Error> {
        let mut rows = self.rows.write().await;

        Ok(rows.get_mut(&id).is_some_and(|record| {
            record.damages = damages;
            record.timestamp = timestamp;
            true
        }))
    }

    async fn remove(&self, id: EntryId) -> Result<bool, Error> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn scan(&self) -> Result<Vec<(EntryId, EntryRecord)>, Error> {
        let rows = self.rows.read().await;

        Ok(rows.iter().map(|(id, r)| (*id, r.clone())).collect())
    }
}

/// Materialize scanned rows newest first, breaking timestamp ties by id.
pub(crate) fn newest_first(rows: Vec<(EntryId, EntryRecord)>) -> Vec<Entry> {
    let mut entries: Vec<Entry> = rows
        .into_iter()
        .map(|(id, record)| Entry::from_record(id, record))
        .collect();

    entries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    entries
}
