//! telemetry/counters.rs
//! Mutable counters used during a transform run.
//!
//! Converted into an immutable TelemetrySnapshot at pipeline end.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub blocks: u64,
    /// Blocks shorter than the key length (at most one per run).
    pub short_blocks: u64,
    /// Dispatch/barrier/flush rounds; zero on the sequential path.
    pub batches: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl TelemetryCounters {
    /// Record one block read from the input.
    pub fn add_block(&mut self, len: usize, block_len: usize) {
        self.blocks += 1;
        self.bytes_in += len as u64;
        if len < block_len {
            self.short_blocks += 1;
        }
    }

    /// Record bytes written for one transformed block.
    pub fn add_output(&mut self, len: usize) {
        self.bytes_out += len as u64;
    }

    /// Record one completed dispatch/barrier/flush round.
    pub fn add_batch(&mut self) {
        self.batches += 1;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.blocks += other.blocks;
        self.short_blocks += other.short_blocks;
        self.batches += other.batches;
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
