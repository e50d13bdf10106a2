//! stream: block-parallel rotating-key transform.
//!
//! Layering, leaf first:
//! - `block` / `queue`: units of work and the two shared queues
//! - `pool` / `worker`: long-lived workers fed through counting semaphores
//! - `coordinator`: dispatch → barrier → ordered flush, batch by batch
//! - `sequential`: single-threaded path with an incrementally rotated key
//! - `core`: validated public entry points

pub mod block;
pub mod queue;
pub mod pool;
pub mod worker;
pub mod coordinator;
pub mod sequential;
pub mod parallelism;
pub mod io;
pub mod core;

pub use block::Block;
pub use io::{InputSource, OutputSink};
pub use parallelism::ParallelismProfile;
pub use pool::{PoolError, WorkerPool};
pub use coordinator::{run_parallel, PipelineCoordinator};
pub use sequential::run_sequential;
pub use self::core::{transform_bytes, transform_stream, ApiConfig};
