//! Key rotation.
//!
//! A block at offset `n` is combined with the base key rotated left by `n`
//! bit positions. Rotation is done in two phases on the caller's buffer:
//! whole bytes first (cycle-following, no allocation), then the remaining
//! 0..8 bits one position at a time.

use crate::constants::BITS_PER_BYTE;

/// Rotate `key` left by `shift` bit positions, in place.
///
/// `shift` is taken modulo the key bit length, so any block index can be
/// passed directly. An empty buffer is left untouched.
pub fn rotate_in_place(key: &mut [u8], shift: u64) {
    if key.is_empty() {
        return;
    }

    let shift = shift % (key.len() as u64 * BITS_PER_BYTE);
    let byte_shift = (shift / BITS_PER_BYTE) as usize;
    let bit_shift = (shift % BITS_PER_BYTE) as u8;

    if byte_shift != 0 {
        rotate_bytes(key, byte_shift);
    }

    if bit_shift != 0 {
        rotate_bits(key, bit_shift);
    }
}

/// Pure variant of [`rotate_in_place`]: returns a rotated copy and leaves
/// `key` unchanged.
pub fn rotated(key: &[u8], shift: u64) -> Vec<u8> {
    let mut out = key.to_vec();
    rotate_in_place(&mut out, shift);
    out
}

/// Single-bit circular left rotation of the whole bit-stream.
///
/// The top bit of byte 0 wraps into the low bit of the last byte.
pub fn rotate_left_one_bit(key: &mut [u8]) {
    let Some(&first) = key.first() else {
        return;
    };
    let carry = first >> 7;
    let last = key.len() - 1;

    for index in 0..last {
        key[index] = (key[index] << 1) | (key[index + 1] >> 7);
    }
    key[last] = (key[last] << 1) | carry;
}

fn rotate_bits(key: &mut [u8], shift: u8) {
    debug_assert!(shift < 8);
    for _ in 0..shift {
        rotate_left_one_bit(key);
    }
}

/// Left-rotate by `shift` whole bytes using cycle-following: `gcd(shift, len)`
/// independent cycles, each walked once with a single carried value.
fn rotate_bytes(key: &mut [u8], shift: usize) {
    let len = key.len();
    debug_assert!(shift > 0 && shift < len);

    for start in 0..gcd(shift, len) {
        let saved = key[start];
        let mut pos = start;

        loop {
            let mut next = pos + shift;
            if next >= len {
                next -= len;
            }
            if next == start {
                break;
            }
            key[pos] = key[next];
            pos = next;
        }

        key[pos] = saved;
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
