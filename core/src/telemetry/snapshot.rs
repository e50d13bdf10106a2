//! telemetry/snapshot.rs
//! Immutable summary of one transform run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Core telemetry snapshot.
/// Captures counters, throughput, stage timings, and elapsed duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Worker threads used; 0 means the sequential path ran.
    pub workers: usize,
    pub block_len: usize,
    pub blocks: u64,
    pub short_blocks: u64,
    pub batches: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    /// CRC32 of everything written, when checksumming was requested.
    pub output_crc32: Option<u32>,
    /// Captured output for in-memory sinks (tests/benchmarks only).
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
}

impl TelemetrySnapshot {
    pub fn from(
        counters: &TelemetryCounters,
        timer: &TelemetryTimer,
        workers: usize,
        block_len: usize,
    ) -> Self {
        let elapsed = timer.elapsed();

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_out as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            workers,
            block_len,
            blocks: counters.blocks,
            short_blocks: counters.short_blocks,
            batches: counters.batches,
            bytes_in: counters.bytes_in,
            bytes_out: counters.bytes_out,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times,
            output_crc32: None,
            output: None,
        }
    }

    pub fn attach_output(&mut self, buf: Vec<u8>) {
        self.output = Some(buf);
    }

    pub fn attach_checksum(&mut self, crc: u32) {
        self.output_crc32 = Some(crc);
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants of a finished run:
    /// - every byte read was written
    /// - at most one short block
    /// - stage time does not exceed elapsed time
    pub fn sanity_check(&self) -> bool {
        self.bytes_in == self.bytes_out
            && self.short_blocks <= 1
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
