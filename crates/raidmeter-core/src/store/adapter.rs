use crate::{
    error::Error,
    obs::{MetricsSink, NoopSink, StoreEvent, StoreOp},
    store::{Collection, collection::newest_first},
    types::{Entry, EntryId, EntryRecord, OwnerId, PlayerName, Sample, Timestamp},
};
use std::sync::Arc;
use tracing::{debug, warn};

///
/// StoreCore
///
/// Operation bodies shared by both trust variants: ordering, filtering,
/// not-found mapping, logging and metrics. Access checks live in the
/// variants themselves.
///

pub(crate) struct StoreCore {
    collection: Arc<dyn Collection>,
    sink: Arc<dyn MetricsSink>,
    project_id: String,
}

impl StoreCore {
    pub(crate) fn new(collection: Arc<dyn Collection>, project_id: String) -> Self {
        Self {
            collection,
            sink: Arc::new(NoopSink),
            project_id,
        }
    }

    pub(crate) fn set_sink(&mut self, sink: Arc<dyn MetricsSink>) {
        self.sink = sink;
    }

    pub(crate) fn project_id(&self) -> &str {
        &self.project_id
    }

    pub(crate) fn denied(&self, op: StoreOp) {
        self.sink.record(StoreEvent::Denied { op });
    }

    fn observe<T>(&self, op: StoreOp, result: Result<T, Error>, rows: impl Fn(&T) -> u64) -> Result<T, Error> {
        match &result {
            Ok(value) => {
                let rows = rows(value);
                debug!(project = %self.project_id, ?op, rows, "store op finished");
                self.sink.record(StoreEvent::Finish { op, rows });
            }
            Err(err) if err.is_not_found() => {
                debug!(project = %self.project_id, ?op, error = %err, "store op target absent");
                self.sink.record(StoreEvent::Failure { op });
            }
            Err(err) => {
                warn!(project = %self.project_id, ?op, error = %err.display_with_kind(), "store op failed");
                self.sink.record(StoreEvent::Failure { op });
            }
        }

        result
    }

    pub(crate) async fn create(
        &self,
        owner_id: OwnerId,
        owner_name: PlayerName,
        sample: Sample,
    ) -> Result<EntryId, Error> {
        let record = EntryRecord::new(owner_id, owner_name, sample);
        let result = self.collection.insert(record).await;

        self.observe(StoreOp::Create, result, |_| 1)
    }

    pub(crate) async fn list_all(&self) -> Result<Vec<Entry>, Error> {
        let result = self.collection.scan().await.map(newest_first);

        self.observe(StoreOp::List, result, |entries| entries.len() as u64)
    }

    pub(crate) async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Entry>, Error> {
        let result = self.collection.scan().await.map(|rows| {
            let owned = rows
                .into_iter()
                .filter(|(_, record)| &record.user_id == owner_id)
                .collect();

            newest_first(owned)
        });

        self.observe(StoreOp::List, result, |entries| entries.len() as u64)
    }

    pub(crate) async fn update(&self, id: EntryId, sample: Sample) -> Result<(), Error> {
        let result = match self.collection.update(id, sample, Timestamp::now()).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::not_found(id)),
            Err(err) => Err(err),
        };

        self.observe(StoreOp::Update, result, |()| 1)
    }

    pub(crate) async fn delete(&self, id: EntryId) -> Result<(), Error> {
        let result = match self.collection.remove(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::not_found(id)),
            Err(err) => Err(err),
        };

        self.observe(StoreOp::Delete, result, |()| 1)
    }
}
