use crate::constants::{DEFAULT_WORKERS, MAX_WORKERS, SEQUENTIAL_WORKERS};
use crate::types::StreamError;

/// Parallelism configuration
///
/// `worker_count == 0` selects the sequential path; anything else is the
/// number of pool threads, which is also the batch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub worker_count: usize,
}

impl Default for ParallelismProfile {
    fn default() -> Self {
        Self { worker_count: DEFAULT_WORKERS }
    }
}

impl ParallelismProfile {
    pub fn sequential() -> Self {
        Self { worker_count: SEQUENTIAL_WORKERS }
    }

    pub fn fixed(worker_count: usize) -> Self {
        Self { worker_count }
    }

    /// One worker per core, leaving a core free for the coordinator.
    pub fn dynamic() -> Self {
        let cores = num_cpus::get();
        let worker_count = cores.saturating_sub(1).clamp(1, MAX_WORKERS);
        log::debug!("[PROFILE] cores={}, workers={}", cores, worker_count);
        Self { worker_count }
    }

    pub fn is_sequential(&self) -> bool {
        self.worker_count == SEQUENTIAL_WORKERS
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.worker_count > MAX_WORKERS {
            return Err(StreamError::Validation(format!(
                "invalid workers count: {}, must be at most {}",
                self.worker_count, MAX_WORKERS
            )));
        }
        Ok(())
    }
}
