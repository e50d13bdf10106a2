//! Stable public API.

use std::io::Cursor;
use std::sync::PoisonError;

use crate::cipher::{Key, KeyError};
use crate::constants::MAX_KEY_LEN;
use crate::stream::coordinator::run_parallel;
use crate::stream::io::{open_input, open_output, InputSource, OutputSink};
use crate::stream::parallelism::ParallelismProfile;
use crate::stream::sequential::run_sequential;
use crate::telemetry::TelemetrySnapshot;
use crate::types::StreamError;
use crate::utils::ChecksumWriter;

#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Whether to capture the output buffer in memory.
    /// - `None` or `Some(false)` → no buffer capture (production default).
    /// - `Some(true)` → capture buffer for tests/benchmarks
    ///   (only honoured for `OutputSink::Memory`).
    pub with_buf: Option<bool>,

    /// Whether to compute a CRC32 of the output stream into the snapshot.
    pub checksum: Option<bool>,
}

impl ApiConfig {
    pub fn new(with_buf: Option<bool>, checksum: Option<bool>) -> Self {
        Self { with_buf, checksum }
    }

    pub fn with_buf_enabled() -> Self {
        Self { with_buf: Some(true), checksum: Some(false) }
    }
}

/// Reject bad preconditions before any stream is opened or any worker exists.
pub fn validate_params(key: &Key, profile: &ParallelismProfile) -> Result<(), StreamError> {
    if key.is_empty() {
        return Err(KeyError::Empty.into());
    }
    if key.len() > MAX_KEY_LEN {
        return Err(KeyError::TooLong { actual: key.len(), max: MAX_KEY_LEN }.into());
    }
    profile.validate()
}

/// Transform `input` into `output`.
///
/// A profile with zero workers runs the sequential path, otherwise the
/// parallel pipeline with that many workers. Both produce identical bytes.
pub fn transform_stream(
    input: InputSource,
    output: OutputSink,
    key: &Key,
    profile: ParallelismProfile,
    config: ApiConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    validate_params(key, &profile)?;

    let reader = open_input(input)?;
    let (writer, maybe_buf) = open_output(output, config.with_buf)?;
    let mut writer = ChecksumWriter::new(writer, config.checksum.unwrap_or(false));

    let mut snapshot = if profile.is_sequential() {
        run_sequential(reader, &mut writer, key)?
    } else {
        run_parallel(reader, &mut writer, key, profile.worker_count)?
    };

    if let Some(crc) = writer.checksum() {
        snapshot.attach_checksum(crc);
    }

    // --- Buffer extraction for tests ---
    if let Some(buf) = maybe_buf {
        let buf = buf.lock().unwrap_or_else(PoisonError::into_inner);
        snapshot.attach_output(buf.clone());
    }

    Ok(snapshot)
}

/// Transform an in-memory buffer, returning the transformed bytes.
pub fn transform_bytes(data: &[u8], key: &Key, workers: usize) -> Result<Vec<u8>, StreamError> {
    let profile = ParallelismProfile::fixed(workers);
    validate_params(key, &profile)?;

    let mut out = Vec::with_capacity(data.len());
    if profile.is_sequential() {
        run_sequential(Cursor::new(data), &mut out, key)?;
    } else {
        run_parallel(Cursor::new(data), &mut out, key, workers)?;
    }
    Ok(out)
}
