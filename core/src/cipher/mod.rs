//! Keystream derivation and the block transform.
//!
//! Responsibilities:
//! - Hold immutable key material
//! - Rotate a key bit-stream by a block offset
//! - XOR a block against its keystream
//!
//! Non-responsibilities:
//! - IO
//! - Threading
//! - Ordering

pub mod types;
pub mod key;
pub mod rotate;
pub mod transform;

pub use types::KeyError;
pub use key::Key;
pub use rotate::{rotate_in_place, rotated, rotate_left_one_bit};
pub use transform::{transform, transform_in_place, BlockTransformer, RotatingXor};
