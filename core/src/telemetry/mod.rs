//! telemetry/mod.rs
//! Counters, stage timers, and immutable snapshots for a transform run.
//!
//! Counters are mutated by the coordinating thread only; workers never touch
//! telemetry, so no atomics are needed.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
