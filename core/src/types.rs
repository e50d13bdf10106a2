use std::io;

use thiserror::Error;

use crate::cipher::KeyError;
use crate::stream::pool::PoolError;

/// Unified stream error covering I/O, key, worker pool, and generic validation.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Messages aim to be stable and contextual for logs.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error on the input or output stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Key material rejected or unreadable.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// Worker pool setup or teardown failure.
    #[error("worker pool error: {0}")]
    Pool(#[from] PoolError),

    /// Pipeline protocol violation (should not happen on a healthy run).
    #[error("pipeline error: {0}")]
    PipelineError(&'static str),

    /// Generic high-level validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}
