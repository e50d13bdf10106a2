use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    /// Key material must contain at least one byte.
    #[error("key is empty")]
    Empty,

    /// Key material exceeds the sanity bound.
    #[error("key too long: {actual} bytes (max {max})")]
    TooLong { actual: usize, max: usize },

    /// Key file could not be opened or read.
    #[error("cannot read key file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Hex key material failed to decode.
    #[error("invalid hex key: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Keystream shorter than the block it should cover.
    #[error("keystream too short: block is {block} bytes, keystream is {keystream} bytes")]
    KeystreamTooShort { block: usize, keystream: usize },
}
