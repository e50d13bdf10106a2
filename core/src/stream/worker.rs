//! Worker routine.
//!
//! Each worker owns one scratch buffer the size of the key. Per block it
//! copies the base key into scratch, rotates scratch by the block index and
//! XORs the payload against it, so no rotated state is ever shared.
//!
//! A worker has no channel to report a recoverable error back through the
//! barrier, so failures here (scratch allocation, broken queue invariants)
//! abort the process instead of leaving the coordinator waiting forever.

use std::fmt::Display;
use std::sync::Arc;

use crate::cipher::BlockTransformer;
use crate::stream::pool::PoolShared;
use crate::utils::hex_preview;

pub(crate) fn run<T: BlockTransformer>(id: usize, shared: Arc<PoolShared<T>>) {
    log::debug!("[WORKER-{id}] starting");

    let Some(mut scratch) = alloc_scratch(shared.key.len()) else {
        fatal(id, format_args!("cannot allocate {} byte scratch key", shared.key.len()));
    };

    while !shared.should_quit() {
        if !shared.work_available.wait() {
            break;
        }
        if shared.should_quit() {
            break;
        }

        let next = shared.lock().work.pop();
        // Spurious wake: the token was not backed by a block.
        let Some(mut block) = next else {
            continue;
        };

        let index = block.index();
        if let Err(e) = shared
            .transformer
            .apply(&shared.key, index, block.data_mut(), &mut scratch)
        {
            fatal(id, format_args!("block {index}: {e}"));
        }
        log::trace!(
            "[WORKER-{id}] block {} done ({} bytes, out={})",
            index,
            block.len(),
            hex_preview(block.data(), 8)
        );

        let inserted = shared.lock().completed.insert(block);
        if let Err(e) = inserted {
            fatal(id, e);
        }
        shared.completion_available.post();
    }

    log::debug!("[WORKER-{id}] finished");
}

fn alloc_scratch(len: usize) -> Option<Vec<u8>> {
    let mut scratch = Vec::new();
    scratch.try_reserve_exact(len).ok()?;
    scratch.resize(len, 0);
    Some(scratch)
}

fn fatal(id: usize, reason: impl Display) -> ! {
    log::error!("[WORKER-{id}] fatal: {reason}; aborting");
    std::process::abort()
}
