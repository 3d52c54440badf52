//! Core runtime for raidmeter: damage statistics, the entry store contract
//! and its adapters, the submission flow, and the view-models the front ends
//! render.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod obs;
pub mod stats;
pub mod store;
pub mod submit;
pub mod types;
pub mod validate;
pub mod view;

pub use error::Error;

///
/// CONSTANTS
///

/// Number of rounds recorded in a single submission.
pub const SAMPLE_LEN: usize = 9;

/// Maximum length of a player display name, in characters.
pub const MAX_NAME_CHARS: usize = 20;

/// Default client-side wait applied to each store call made by a submission.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

///
/// Prelude
///
/// Domain vocabulary only. Stores, flows and view-models are imported from
/// their own modules.
///

pub mod prelude {
    pub use crate::{
        stats::Metrics,
        types::{Entry, EntryId, OwnerId, PlayerName, Sample, Timestamp},
    };
}
