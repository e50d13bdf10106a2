//! telemetry/timers.rs
//! Wall-clock accounting for the stages of one transform run.
//!
//! The stage set is closed, so each stage gets its own field rather than a
//! map entry; the JSON form is one `stage: duration` object.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Filling blocks from the input stream.
    Read,
    /// Handing blocks to the work queue.
    Dispatch,
    /// Coordinator blocked waiting for batch completions.
    Barrier,
    /// Inline keystream + XOR (sequential path only).
    Transform,
    /// Writing transformed blocks to the output stream.
    Write,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Read,
        Stage::Dispatch,
        Stage::Barrier,
        Stage::Transform,
        Stage::Write,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Read => "read",
            Stage::Dispatch => "dispatch",
            Stage::Barrier => "barrier",
            Stage::Transform => "transform",
            Stage::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accumulated time per stage. Unmeasured stages read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimes {
    read: Duration,
    dispatch: Duration,
    barrier: Duration,
    transform: Duration,
    write: Duration,
}

impl StageTimes {
    fn slot(&mut self, stage: Stage) -> &mut Duration {
        match stage {
            Stage::Read => &mut self.read,
            Stage::Dispatch => &mut self.dispatch,
            Stage::Barrier => &mut self.barrier,
            Stage::Transform => &mut self.transform,
            Stage::Write => &mut self.write,
        }
    }

    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.slot(stage) += dur;
    }

    pub fn get(&self, stage: Stage) -> Duration {
        match stage {
            Stage::Read => self.read,
            Stage::Dispatch => self.dispatch,
            Stage::Barrier => self.barrier,
            Stage::Transform => self.transform,
            Stage::Write => self.write,
        }
    }

    pub fn get_ms(&self, stage: Stage) -> f64 {
        self.get(stage).as_secs_f64() * 1_000.0
    }

    pub fn get_us(&self, stage: Stage) -> f64 {
        self.get(stage).as_secs_f64() * 1_000_000.0
    }

    pub fn total(&self) -> Duration {
        self.iter().map(|(_, dur)| dur).sum()
    }

    /// True when every stage in `expected` recorded some time.
    pub fn has_all(&self, expected: &[Stage]) -> bool {
        expected.iter().all(|s| !self.get(*s).is_zero())
    }

    pub fn merge(&mut self, other: &StageTimes) {
        for (stage, dur) in other.iter() {
            self.add(stage, dur);
        }
    }

    /// Every stage with its accumulated time, in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, Duration)> + '_ {
        Stage::ALL.into_iter().map(move |stage| (stage, self.get(stage)))
    }

    /// `stage=ms` pairs for measured stages, sorted by stage name.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self
            .iter()
            .filter(|(_, dur)| !dur.is_zero())
            .map(|(stage, dur)| format!("{}={:.3}ms", stage, dur.as_secs_f64() * 1_000.0))
            .collect();
        parts.sort();
        parts.join(" ")
    }
}

/// Run clock plus per-stage accumulators, owned by the coordinating thread.
#[derive(Clone, Debug)]
pub struct TelemetryTimer {
    started: Instant,
    finished: Option<Instant>,
    pub stage_times: StageTimes,
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryTimer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            finished: None,
            stage_times: StageTimes::default(),
        }
    }

    /// Stop the run clock. Later calls move the end point forward.
    pub fn finish(&mut self) {
        self.finished = Some(Instant::now());
    }

    pub fn add_stage_time(&mut self, stage: Stage, dur: Duration) {
        self.stage_times.add(stage, dur);
    }

    /// Run `f`, charging its wall time to `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.stage_times.add(stage, start.elapsed());
        out
    }

    /// Time from construction to `finish`, or to now while still running.
    pub fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(Instant::now).duration_since(self.started)
    }
}
