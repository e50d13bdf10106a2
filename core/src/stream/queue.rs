//! Work and completion queues.
//!
//! Neither queue synchronises on its own; the pool keeps both behind a
//! single mutex.

use std::collections::VecDeque;

use thiserror::Error;

use crate::stream::block::Block;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("duplicate block index {0} in completion queue")]
    DuplicateIndex(u64),
}

/// FIFO of blocks waiting for a worker.
#[derive(Debug, Default)]
pub struct WorkQueue {
    blocks: VecDeque<Block>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push_back(block);
    }

    pub fn pop(&mut self) -> Option<Block> {
        self.blocks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drop every queued block, returning how many were released.
    pub fn clear(&mut self) -> usize {
        let n = self.blocks.len();
        self.blocks.clear();
        n
    }
}

/// Transformed blocks, kept strictly ascending by index at all times.
#[derive(Debug, Default)]
pub struct CompletionQueue {
    blocks: Vec<Block>,
}

impl CompletionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered insert: the block lands before the first entry with a larger
    /// index. Workers finish out of order, so this is never a plain append.
    pub fn insert(&mut self, block: Block) -> Result<(), QueueError> {
        match self.blocks.binary_search_by_key(&block.index(), Block::index) {
            Ok(_) => Err(QueueError::DuplicateIndex(block.index())),
            Err(pos) => {
                self.blocks.insert(pos, block);
                Ok(())
            }
        }
    }

    /// Remove every block, in ascending index order.
    pub fn take_all(&mut self) -> Vec<Block> {
        std::mem::take(&mut self.blocks)
    }

    pub fn indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.blocks.iter().map(Block::index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn clear(&mut self) -> usize {
        let n = self.blocks.len();
        self.blocks.clear();
        n
    }
}
