//! Observability: store operation counters and the sink abstraction.
//!
//! Log lines go through `tracing` at the call sites; this module only holds
//! counters that outlive a single request.

pub mod sink;

// re-exports
pub use sink::{MetricsSink, NoopSink, StoreCounters, StoreEvent, StoreOp, StoreReport};
