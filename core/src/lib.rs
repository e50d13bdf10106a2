//! rotxor-core
//!
//! Block-parallel rotating-key XOR stream transformer.
//! No CLI, no process handling.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod cipher;
pub mod telemetry;

// Stream layers
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::cipher::{Key, KeyError};
    pub use crate::stream::{
        transform_bytes, transform_stream, ApiConfig, InputSource, OutputSink, ParallelismProfile,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::StreamError;
}
