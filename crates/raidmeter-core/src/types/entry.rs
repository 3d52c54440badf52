use crate::types::{EntryId, OwnerId, PlayerName, Sample, Timestamp};
use serde::{Deserialize, Serialize};

///
/// EntryRecord
/// Persisted document body. The id is the document key, not a field.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub user_id: OwnerId,
    pub user_name: PlayerName,
    pub damages: Sample,
    pub timestamp: Timestamp,
}

impl EntryRecord {
    /// Build a fresh record stamped with the current time.
    #[must_use]
    pub fn new(owner_id: OwnerId, owner_name: PlayerName, sample: Sample) -> Self {
        Self {
            user_id: owner_id,
            user_name: owner_name,
            damages: sample,
            timestamp: Timestamp::now(),
        }
    }
}

///
/// Entry
/// One stored submission as returned by the store and the HTTP surface.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    #[serde(rename = "userId")]
    pub owner_id: OwnerId,
    #[serde(rename = "userName")]
    pub owner_name: PlayerName,
    #[serde(rename = "damages")]
    pub sample: Sample,
    #[serde(rename = "timestamp")]
    pub created_at: Timestamp,
}

impl Entry {
    #[must_use]
    pub fn from_record(id: EntryId, record: EntryRecord) -> Self {
        Self {
            id,
            owner_id: record.user_id,
            owner_name: record.user_name,
            sample: record.damages,
            created_at: record.timestamp,
        }
    }

    /// Sum of the entry's sample; its contribution to the population.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.sample.total()
    }
}

///
/// TESTS
///
