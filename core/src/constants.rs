//! Shared limits and defaults.

/// Worker count that selects the sequential path.
pub const SEQUENTIAL_WORKERS: usize = 0;

/// Defaults when no worker count is supplied.
pub const DEFAULT_WORKERS: usize = SEQUENTIAL_WORKERS;

/// Upper bound on worker threads accepted by the parallel pipeline.
pub const MAX_WORKERS: usize = 256;

/// Key length sanity bound (16 MiB). The key length is also the block size,
/// so every in-flight block allocates this much.
pub const MAX_KEY_LEN: usize = 16 * 1024 * 1024;

/// Number of bits in one key byte, used when normalising rotation shifts.
pub const BITS_PER_BYTE: u64 = 8;
