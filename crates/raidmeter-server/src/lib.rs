//! HTTP surface for raidmeter.
//!
//! Every write goes through the elevated store held in [`AppState`]; the
//! handlers only validate input and translate errors into status codes.
#![warn(unreachable_pub)]

pub mod api;
pub mod config;

use axum::{
    Router,
    routing::{get, put},
};
use raidmeter_core::{Error, obs::StoreCounters, store::EntryStore};
use std::{future::Future, sync::Arc, time::Duration};

///
/// AppState
/// Shared by every request task; cloning is cheap.
///

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn EntryStore>,
    counters: Arc<StoreCounters>,
    timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn EntryStore>, counters: Arc<StoreCounters>, timeout: Duration) -> Self {
        Self {
            store,
            counters,
            timeout,
        }
    }

    #[must_use]
    pub fn store(&self) -> &dyn EntryStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn counters(&self) -> &StoreCounters {
        &self.counters
    }

    /// Await a store call, giving up after the configured request timeout.
    pub(crate) async fn bounded<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .unwrap_or_else(|_| Err(Error::timeout(what, self.timeout)))
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/damage",
            get(api::list_entries).post(api::create_entry),
        )
        .route("/api/damage/totals", get(api::user_totals))
        .route(
            "/api/damage/{id}",
            put(api::update_entry).delete(api::delete_entry),
        )
        .with_state(state)
}
