use std::fmt;
use std::io::{self, Read};

use bytes::BytesMut;

use crate::stream::io::read_full_or_eof;

/// One block of the stream: an ordinal index and a payload buffer sized to
/// the key length, of which only the first `len` bytes are meaningful.
///
/// Blocks are moved between the producer, the work queue, a worker and the
/// completion queue; they are never shared.
pub struct Block {
    index: u64,
    payload: BytesMut,
    len: usize,
}

impl Block {
    /// Empty block with `capacity` zeroed payload bytes.
    pub fn new(index: u64, capacity: usize) -> Self {
        Self {
            index,
            payload: BytesMut::zeroed(capacity),
            len: 0,
        }
    }

    /// Block holding a copy of `data`, with capacity equal to its length.
    pub fn from_slice(index: u64, data: &[u8]) -> Self {
        Self {
            index,
            payload: BytesMut::from(data),
            len: data.len(),
        }
    }

    /// Fill the payload from `reader`, returning the number of bytes read.
    ///
    /// Reads until the payload is full or the reader reports end of stream,
    /// so a result shorter than `capacity()` means the stream is exhausted.
    pub fn fill_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<usize> {
        self.len = read_full_or_eof(reader, &mut self.payload[..])?;
        Ok(self.len)
    }

    /// Reuse this block for another stream position.
    pub fn reindex(&mut self, index: u64) {
        self.index = index;
        self.len = 0;
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.payload.len()
    }

    /// True for a final block shorter than the block size.
    pub fn is_short(&self) -> bool {
        self.len < self.payload.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.payload[..self.len]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.payload[..self.len]
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("index", &self.index)
            .field("len", &self.len)
            .field("capacity", &self.payload.len())
            .finish()
    }
}
