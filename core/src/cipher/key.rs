use std::fmt;
use std::fs;
use std::path::Path;

use bytes::Bytes;

use crate::cipher::KeyError;
use crate::constants::MAX_KEY_LEN;

/// Immutable key material shared by every worker.
///
/// The key length doubles as the block size of the stream. Cloning is cheap
/// (reference counted) and only read-only views are handed out, so workers
/// must copy into their own scratch buffer before rotating.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    bytes: Bytes,
}

impl Key {
    /// Build a key from raw bytes, rejecting empty or oversized material.
    pub fn new(bytes: impl Into<Bytes>) -> Result<Self, KeyError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(KeyError::Empty);
        }
        if bytes.len() > MAX_KEY_LEN {
            return Err(KeyError::TooLong { actual: bytes.len(), max: MAX_KEY_LEN });
        }
        Ok(Self { bytes })
    }

    /// Load the entire contents of a key file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| KeyError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("[KEY] loaded {} bytes from {:?}", bytes.len(), path);
        Self::new(bytes)
    }

    /// Parse hex-encoded key material (whitespace is ignored).
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        Self::new(hex::decode(compact)?)
    }

    /// Key length in bytes, which is also the block size.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a constructed key; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length of the key bit-stream; rotation shifts are taken modulo this.
    pub fn bit_len(&self) -> u64 {
        self.bytes.len() as u64 * crate::constants::BITS_PER_BYTE
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

// Key bytes stay out of logs.
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key").field("len", &self.bytes.len()).finish()
    }
}
