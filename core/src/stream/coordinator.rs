//! Parallel pipeline coordinator.
//!
//! Runs on the calling thread and drives the pool batch by batch:
//!
//! 1. Dispatch: read up to `workers` blocks, submitting each one.
//! 2. Barrier: wait for exactly as many completions as blocks dispatched.
//! 3. Flush: drain the completion queue (already ascending) to the output.
//!
//! The barrier count is the number of blocks actually dispatched, which is
//! smaller than `workers` on the last batch.

use std::io::{Read, Write};
use std::time::Instant;

use crate::cipher::{BlockTransformer, Key, RotatingXor};
use crate::stream::block::Block;
use crate::stream::pool::WorkerPool;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Transform `reader` into `writer` with a pool of `workers` threads.
pub fn run_parallel<R, W>(
    reader: R,
    writer: W,
    key: &Key,
    workers: usize,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write,
{
    let pool = WorkerPool::spawn(key.clone(), workers)?;
    PipelineCoordinator::new(pool).run(reader, writer)
}

pub struct PipelineCoordinator<T: BlockTransformer = RotatingXor> {
    pool: WorkerPool<T>,
    next_index: u64,
    finished: bool,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl<T: BlockTransformer> PipelineCoordinator<T> {
    pub fn new(pool: WorkerPool<T>) -> Self {
        Self {
            pool,
            next_index: 0,
            finished: false,
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(),
        }
    }

    /// Run the stream to completion and tear the pool down.
    ///
    /// Teardown happens on both success and error; the first error wins.
    pub fn run<R, W>(mut self, mut reader: R, mut writer: W) -> Result<TelemetrySnapshot, StreamError>
    where
        R: Read,
        W: Write,
    {
        let workers = self.pool.workers();
        let block_len = self.pool.key().len();
        log::info!("[PIPELINE] start: workers={}, block_len={}", workers, block_len);

        let result = self.pump(&mut reader, &mut writer);
        let teardown = self.pool.shutdown();
        result?;
        teardown?;

        self.timer.finish();
        log::info!(
            "[PIPELINE] done: blocks={}, batches={}, bytes={}",
            self.counters.blocks,
            self.counters.batches,
            self.counters.bytes_out
        );
        Ok(TelemetrySnapshot::from(&self.counters, &self.timer, workers, block_len))
    }

    fn pump<R: Read, W: Write>(&mut self, reader: &mut R, writer: &mut W) -> Result<(), StreamError> {
        while !self.finished {
            let first = self.next_index;
            let dispatched = self.dispatch(reader)?;
            if dispatched == 0 {
                break;
            }

            let start = Instant::now();
            self.pool.wait_for(dispatched)?;
            self.timer.add_stage_time(Stage::Barrier, start.elapsed());

            self.flush(writer, first, dispatched)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Read and submit up to one block per worker. Returns the number of
    /// blocks submitted; marks the stream finished on a zero or short read.
    fn dispatch<R: Read>(&mut self, reader: &mut R) -> Result<usize, StreamError> {
        let block_len = self.pool.key().len();
        let mut dispatched = 0;

        for _slot in 0..self.pool.workers() {
            let mut block = Block::new(self.next_index, block_len);

            let start = Instant::now();
            let n = block.fill_from(reader)?;
            self.timer.add_stage_time(Stage::Read, start.elapsed());

            if n == 0 {
                log::debug!("[READER] EOF before block {}", self.next_index);
                self.finished = true;
                break;
            }

            self.counters.add_block(n, block_len);
            self.next_index += 1;

            let start = Instant::now();
            self.pool.submit(block);
            self.timer.add_stage_time(Stage::Dispatch, start.elapsed());
            dispatched += 1;

            if n < block_len {
                log::debug!("[READER] short final block {} ({} bytes)", self.next_index - 1, n);
                self.finished = true;
                break;
            }
        }

        Ok(dispatched)
    }

    /// Write one completed batch. The completion queue must hold exactly the
    /// contiguous index range `first..first + dispatched`.
    fn flush<W: Write>(&mut self, writer: &mut W, first: u64, dispatched: usize) -> Result<(), StreamError> {
        let blocks = self.pool.take_completed();
        if blocks.len() != dispatched {
            return Err(StreamError::PipelineError(
                "completion queue size does not match dispatched batch",
            ));
        }

        let start = Instant::now();
        for (expected, block) in (first..).zip(&blocks) {
            if block.index() != expected {
                return Err(StreamError::PipelineError("completion queue out of order"));
            }
            writer.write_all(block.data())?;
            self.counters.add_output(block.len());
        }
        self.timer.add_stage_time(Stage::Write, start.elapsed());

        self.counters.add_batch();
        log::trace!("[WRITER] flushed blocks {}..{}", first, first + dispatched as u64);
        Ok(())
    }
}
