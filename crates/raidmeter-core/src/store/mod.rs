//! Entry store contract and its adapters.
//!
//! [`EntryStore`] is the only surface callers see. Two adapters implement
//! it over a raw document [`Collection`]:
//!
//! - [`AdminStore`]: elevated credentials, full access, server-side only.
//! - [`ClientStore`]: audience-scoped credentials checked against
//!   [`AccessRules`] before every operation.
//!
//! Both return identical results for permitted operations, so callers stay
//! agnostic to which one they hold.

mod adapter;
mod admin;
mod client;
mod collection;
mod document;

#[cfg(test)]
mod tests;

pub use admin::AdminStore;
pub use client::{AccessRules, ClientStore};
pub use collection::{Collection, MemoryCollection};
pub use document::DocumentCollection;

use crate::{
    error::Error,
    types::{Entry, EntryId, OwnerId, PlayerName, Sample},
};
use async_trait::async_trait;

///
/// EntryStore
///
/// Durable CRUD over the entry collection. Listings are ordered newest
/// first; entries written in the same millisecond keep creation order.
///

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persist a new entry stamped with the current time; returns its id.
    async fn create(
        &self,
        owner_id: OwnerId,
        owner_name: PlayerName,
        sample: Sample,
    ) -> Result<EntryId, Error>;

    /// Every stored entry, newest first.
    async fn list_all(&self) -> Result<Vec<Entry>, Error>;

    /// Entries owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Entry>, Error>;

    /// Replace the sample and restamp the entry; `NotFound` if absent.
    async fn update(&self, id: EntryId, sample: Sample) -> Result<(), Error>;

    /// Remove the entry; `NotFound` if absent.
    async fn delete(&self, id: EntryId) -> Result<(), Error>;

    /// Per-entry totals in `list_all` order: the percentile population.
    async fn all_totals(&self) -> Result<Vec<f64>, Error> {
        let entries = self.list_all().await?;

        Ok(entries.iter().map(Entry::total).collect())
    }
}
