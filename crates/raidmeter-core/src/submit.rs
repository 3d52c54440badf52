//! Submission flow: validate, compute metrics, persist, refresh.
//!
//! One flow per interactive session. It owns the cached population of
//! per-entry totals that percentiles are computed against, and remembers the
//! outcome of the last submission for the front end to render.

use crate::{
    DEFAULT_STORE_TIMEOUT_SECS,
    error::{Error, ErrorKind, StoreErrorKind},
    stats::{self, Metrics, PopulationSummary},
    store::EntryStore,
    types::{EntryId, OwnerId, PlayerName, Sample},
};
use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tracing::{debug, info, warn};

///
/// BusySignal
/// Whether a flow is waiting on the store. Clones share the flag, so another
/// task can watch a flow while `submit` holds it mutably.
///

#[derive(Clone, Debug, Default)]
pub struct BusySignal(Arc<AtomicBool>);

impl BusySignal {
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn enter(&self) -> BusyGuard<'_> {
        self.0.store(true, Ordering::Release);
        BusyGuard(&self.0)
    }
}

/// Clears the flag on drop, including when the awaiting future is dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

///
/// SubmissionFlow
///

pub struct SubmissionFlow<S: EntryStore + ?Sized> {
    store: Arc<S>,
    owner_id: OwnerId,
    owner_name: PlayerName,
    population: Vec<f64>,
    busy: BusySignal,
    last_error: Option<Error>,
    last_metrics: Option<Metrics>,
    last_success: Option<String>,
    timeout: Duration,
}

impl<S: EntryStore + ?Sized> SubmissionFlow<S> {
    /// Start a flow for a fresh session identity.
    pub fn new(store: Arc<S>, owner_name: PlayerName) -> Self {
        Self::with_owner(store, OwnerId::session(), owner_name)
    }

    pub fn with_owner(store: Arc<S>, owner_id: OwnerId, owner_name: PlayerName) -> Self {
        Self {
            store,
            owner_id,
            owner_name,
            population: Vec::new(),
            busy: BusySignal::default(),
            last_error: None,
            last_metrics: None,
            last_success: None,
            timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        }
    }

    /// Replace the wait applied to each store call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    #[must_use]
    pub const fn owner_name(&self) -> &PlayerName {
        &self.owner_name
    }

    #[must_use]
    pub fn population(&self) -> &[f64] {
        &self.population
    }

    #[must_use]
    pub fn population_summary(&self) -> PopulationSummary {
        PopulationSummary::from_totals(&self.population)
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    /// Handle for observers outside the flow.
    #[must_use]
    pub fn busy_signal(&self) -> BusySignal {
        self.busy.clone()
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub const fn last_metrics(&self) -> Option<&Metrics> {
        self.last_metrics.as_ref()
    }

    #[must_use]
    pub fn last_success(&self) -> Option<&str> {
        self.last_success.as_deref()
    }

    /// Drop the success notice once the front end has shown it.
    pub fn clear_success(&mut self) {
        self.last_success = None;
    }

    /// Store handle, for front-end reads outside the flow.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Refresh the cached population. On failure the old cache is kept.
    pub async fn load_population(&mut self) -> Result<(), Error> {
        let result = {
            let _busy = self.busy.enter();
            self.bounded("loading totals", self.store.all_totals()).await
        };

        match result {
            Ok(totals) => {
                debug!(count = totals.len(), "population loaded");
                self.population = totals;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err.display_with_kind(), "failed to load population");
                Err(err)
            }
        }
    }

    /// Validate and record one sample.
    ///
    /// Metrics are computed against the population cached *before* this
    /// call and are kept even if persisting afterwards fails.
    pub async fn submit(&mut self, raw_sample: Vec<f64>) -> Result<Metrics, Error> {
        self.last_success = None;

        let sample = match Sample::new(&raw_sample) {
            Ok(sample) => sample,
            Err(err) => {
                let err = Error::from(err);
                self.last_error = Some(err.clone());
                return Err(err);
            }
        };

        let metrics = stats::all_metrics(sample.as_array(), &self.population);
        self.last_metrics = Some(metrics);

        let result = {
            let _busy = self.busy.enter();
            self.persist(sample).await
        };

        match result {
            Ok((id, totals)) => {
                info!(%id, owner = %self.owner_id, total = metrics.total, "damage entry saved");
                self.population = totals;
                self.last_error = None;
                self.last_success = Some("Damage entry saved successfully!".to_string());

                Ok(metrics)
            }
            Err(err) => {
                warn!(owner = %self.owner_id, error = %err.display_with_kind(), "failed to save damage entry");
                self.last_error = Some(err.clone());

                Err(err)
            }
        }
    }

    async fn persist(&self, sample: Sample) -> Result<(EntryId, Vec<f64>), Error> {
        let id = self
            .bounded(
                "saving entry",
                self.store
                    .create(self.owner_id.clone(), self.owner_name.clone(), sample),
            )
            .await?;
        let totals = self
            .bounded("reloading totals", self.store.all_totals())
            .await?;

        Ok((id, totals))
    }

    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .unwrap_or_else(|_| Err(Error::timeout(what, self.timeout)))
    }
}

/// User-facing guidance for a structured error.
#[must_use]
pub const fn user_message(err: &Error) -> &'static str {
    match err.kind {
        ErrorKind::Validation => "Please check the damage values and try again.",
        ErrorKind::Timeout => {
            "The store did not respond in time. Check the store configuration and restart the app."
        }
        ErrorKind::Store(StoreErrorKind::PermissionDenied) => {
            "The store refused access. Check the store access rules."
        }
        ErrorKind::Store(StoreErrorKind::Misconfigured) => {
            "The store is not configured. Check the credentials and restart the app."
        }
        ErrorKind::Store(_) | ErrorKind::NotFound => "Failed to save damage entry.",
    }
}

///
/// TESTS
///
