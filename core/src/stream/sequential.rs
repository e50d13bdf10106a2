//! Single-threaded path.
//!
//! One working key and one reusable block. After each block the working key
//! is rotated one more bit, which yields the same keystream the pool derives
//! with `rotate(base, index)`.

use std::io::{Read, Write};
use std::time::Instant;

use crate::cipher::{rotate_in_place, transform_in_place, Key};
use crate::stream::block::Block;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

pub fn run_sequential<R, W>(mut reader: R, mut writer: W, key: &Key) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write,
{
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();

    let block_len = key.len();
    let mut keystream = key.as_bytes().to_vec();
    let mut block = Block::new(0, block_len);
    log::info!("[SEQUENTIAL] start: block_len={}", block_len);

    for index in 0.. {
        block.reindex(index);

        let n = timer.time(Stage::Read, || block.fill_from(&mut reader))?;
        if n == 0 {
            break;
        }
        counters.add_block(n, block_len);

        let start = Instant::now();
        transform_in_place(block.data_mut(), &keystream)?;
        rotate_in_place(&mut keystream, 1);
        timer.add_stage_time(Stage::Transform, start.elapsed());

        timer.time(Stage::Write, || writer.write_all(block.data()))?;
        counters.add_output(n);

        if n < block_len {
            break;
        }
    }

    writer.flush()?;
    timer.finish();

    log::info!("[SEQUENTIAL] done: blocks={}, bytes={}", counters.blocks, counters.bytes_out);
    Ok(TelemetrySnapshot::from(&counters, &timer, 0, block_len))
}
