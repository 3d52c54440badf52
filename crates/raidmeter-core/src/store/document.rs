use crate::{
    error::{Error, StoreErrorKind},
    store::Collection,
    types::{EntryId, EntryRecord, Sample, Timestamp},
};
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};
use tracing::debug;

/// File name of the entry collection inside a project directory.
pub const COLLECTION_FILE: &str = "entries.json";

type Rows = BTreeMap<EntryId, EntryRecord>;

///
/// DocumentCollection
///
/// Durable collection stored as one JSON document per project:
/// `<data_dir>/<project_id>/entries.json`, an object keyed by entry id.
///
/// The file is read on first use and rewritten through a temp file and a
/// rename on every write, so a crash leaves either the old or the new
/// document. Each write runs on its own task and holds the lock until the
/// rename and the cache update are done, even if the caller stops waiting.
///

#[derive(Debug)]
pub struct DocumentCollection {
    inner: Arc<Document>,
}

#[derive(Debug)]
struct Document {
    path: PathBuf,
    rows: Mutex<Option<Rows>>,
}

impl DocumentCollection {
    /// Locate the collection for `project_id` under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>, project_id: &str) -> Result<Self, Error> {
        let valid = !project_id.is_empty()
            && project_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::store(
                StoreErrorKind::Misconfigured,
                format!("invalid project id: '{project_id}'"),
            ));
        }

        Ok(Self {
            inner: Arc::new(Document {
                path: data_dir.as_ref().join(project_id).join(COLLECTION_FILE),
                rows: Mutex::new(None),
            }),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    async fn write<T, F>(&self, f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut Rows) -> (T, bool) + Send + 'static,
    {
        let document = Arc::clone(&self.inner);

        tokio::spawn(async move { document.write(f).await })
            .await
            .map_err(|e| {
                Error::store(
                    StoreErrorKind::Unavailable,
                    format!("collection write aborted: {e}"),
                )
            })?
    }
}

impl Document {
    async fn load(&self) -> Result<Rows, Error> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::store(
                    StoreErrorKind::Corrupt,
                    format!("{}: {e}", self.path.display()),
                )
            }),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(Rows::new()),
            Err(e) => Err(unavailable(&self.path, &e)),
        }
    }

    async fn persist(&self, rows: &Rows) -> Result<(), Error> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| unavailable(dir, &e))?;
        }

        let bytes = serde_json::to_vec_pretty(rows)
            .map_err(|e| Error::store(StoreErrorKind::Corrupt, e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, bytes)
            .await
            .map_err(|e| unavailable(&tmp, &e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| unavailable(&self.path, &e))?;

        debug!(path = %self.path.display(), rows = rows.len(), "collection persisted");

        Ok(())
    }

    /// Run `f` against a copy of the rows and persist it if `f` reports a change.
    ///
    /// The cache is empty while persisting, so a failed write is re-read
    /// from disk on the next call.
    async fn write<T>(&self, f: impl FnOnce(&mut Rows) -> (T, bool)) -> Result<T, Error> {
        let mut guard = self.rows.lock().await;
        let mut rows = match guard.take() {
            Some(rows) => rows,
            None => self.load().await?,
        };

        let (out, changed) = f(&mut rows);
        if changed {
            self.persist(&rows).await?;
        }
        *guard = Some(rows);

        Ok(out)
    }

    async fn scan(&self) -> Result<Vec<(EntryId, EntryRecord)>, Error> {
        let mut guard = self.rows.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }

        Ok(guard
            .iter()
            .flatten()
            .map(|(id, record)| (*id, record.clone()))
            .collect())
    }
}

#[async_trait]
impl Collection for DocumentCollection {
    async fn insert(&self, record: EntryRecord) -> Result<EntryId, Error> {
        let id = EntryId::generate()?;

        self.write(move |rows| {
            rows.insert(id, record);
            (id, true)
        })
        .await
    }

    async fn update(
        &self,
        id: EntryId,
        damages: Sample,
        timestamp: Timestamp,
    ) -> Result<bool, Error> {
        self.write(move |rows| match rows.get_mut(&id) {
            Some(record) => {
                record.damages = damages;
                record.timestamp = timestamp;
                (true, true)
            }
            None => (false, false),
        })
        .await
    }

    async fn remove(&self, id: EntryId) -> Result<bool, Error> {
        self.write(move |rows| {
            let removed = rows.remove(&id).is_some();
            (removed, removed)
        })
        .await
    }

    async fn scan(&self) -> Result<Vec<(EntryId, EntryRecord)>, Error> {
        self.inner.scan().await
    }
}

fn unavailable(path: &Path, err: &std::io::Error) -> Error {
    Error::store(
        StoreErrorKind::Unavailable,
        format!("{}: {err}", path.display()),
    )
}
