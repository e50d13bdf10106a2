use crate::cipher::{rotate_in_place, Key, KeyError};

/// XOR `block` with `keystream` in place.
///
/// Only the first `block.len()` keystream bytes are used. Applying the same
/// keystream twice restores the original bytes.
pub fn transform_in_place(block: &mut [u8], keystream: &[u8]) -> Result<(), KeyError> {
    if block.len() > keystream.len() {
        return Err(KeyError::KeystreamTooShort {
            block: block.len(),
            keystream: keystream.len(),
        });
    }

    for (byte, k) in block.iter_mut().zip(keystream) {
        *byte ^= *k;
    }
    Ok(())
}

/// Pure variant of [`transform_in_place`].
pub fn transform(block: &[u8], keystream: &[u8]) -> Result<Vec<u8>, KeyError> {
    let mut out = block.to_vec();
    transform_in_place(&mut out, keystream)?;
    Ok(out)
}

/// Per-block work executed by pool workers.
///
/// `scratch` is the worker's private buffer, already sized to the key
/// length; implementations may overwrite it freely. The base key must not be
/// mutated (it is shared and only readable through `&Key`).
pub trait BlockTransformer: Send + Sync + 'static {
    fn apply(
        &self,
        key: &Key,
        index: u64,
        payload: &mut [u8],
        scratch: &mut [u8],
    ) -> Result<(), KeyError>;
}

/// Default transformer: keystream = base key rotated left by `index` bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotatingXor;

impl BlockTransformer for RotatingXor {
    fn apply(
        &self,
        key: &Key,
        index: u64,
        payload: &mut [u8],
        scratch: &mut [u8],
    ) -> Result<(), KeyError> {
        scratch.copy_from_slice(key.as_bytes());
        rotate_in_place(scratch, index);
        transform_in_place(payload, scratch)
    }
}
