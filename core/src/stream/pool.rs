//! Worker pool: shared state, signalling, and lifecycle.
//!
//! The pool owns `n` long-lived worker threads. The producer pushes blocks
//! into the work queue and posts `work_available` once per block; each
//! worker posts `completion_available` once per finished block. Both queues
//! sit behind one mutex, and no lock is held across a semaphore wait.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver, Sender};
use thiserror::Error;

use crate::cipher::{BlockTransformer, Key, RotatingXor};
use crate::constants::MAX_WORKERS;
use crate::stream::block::Block;
use crate::stream::queue::{CompletionQueue, WorkQueue};
use crate::stream::worker;

/// How long the barrier waits on one completion before checking that every
/// worker is still alive.
const LIVENESS_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool needs at least one worker")]
    NoWorkers,

    #[error("too many workers: {requested} (max {max})")]
    TooManyWorkers { requested: usize, max: usize },

    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },

    #[error("{0} worker thread(s) panicked")]
    WorkerPanicked(usize),

    #[error("worker exited while {pending} completion(s) were outstanding")]
    WorkerExited { pending: usize },
}

/// Counting semaphore over a channel of unit tokens.
///
/// Every `post` adds exactly one token and every `wait` consumes exactly
/// one, so N posts release exactly N waits.
#[derive(Debug)]
pub struct Semaphore {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new()
    }
}

impl Semaphore {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn post(&self) {
        // Both channel ends live in `self`, so send cannot fail.
        let _ = self.tx.send(());
    }

    /// Block until a token is available and consume it.
    pub fn wait(&self) -> bool {
        self.rx.recv().is_ok()
    }

    pub fn try_wait(&self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Like `wait`, but gives up after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.rx.recv_timeout(timeout).is_ok()
    }

    /// Tokens posted but not yet consumed.
    pub fn available(&self) -> usize {
        self.rx.len()
    }
}

/// Both queues, guarded together by `PoolShared::queues`.
#[derive(Debug, Default)]
pub(crate) struct PoolQueues {
    pub work: WorkQueue,
    pub completed: CompletionQueue,
}

/// State shared by the coordinator and every worker.
pub(crate) struct PoolShared<T> {
    pub quit: AtomicBool,
    pub queues: Mutex<PoolQueues>,
    pub work_available: Semaphore,
    pub completion_available: Semaphore,
    /// Read-only after construction; workers rotate private copies.
    pub key: Key,
    pub transformer: T,
}

impl<T> PoolShared<T> {
    /// Lock both queues. Queue operations cannot panic midway, so a
    /// poisoned lock still guards consistent data and is recovered.
    pub fn lock(&self) -> MutexGuard<'_, PoolQueues> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn should_quit(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }
}

pub struct WorkerPool<T: BlockTransformer = RotatingXor> {
    shared: Arc<PoolShared<T>>,
    handles: Vec<JoinHandle<()>>,
    worker_count: usize,
    torn_down: bool,
}

impl WorkerPool<RotatingXor> {
    /// Spawn `workers` threads running the rotating-key XOR transform.
    pub fn spawn(key: Key, workers: usize) -> Result<Self, PoolError> {
        Self::spawn_with(key, workers, RotatingXor)
    }
}

impl<T: BlockTransformer> WorkerPool<T> {
    /// Spawn `workers` threads running `transformer`.
    ///
    /// If any thread fails to start, the workers already running are shut
    /// down and joined before the error is returned.
    pub fn spawn_with(key: Key, workers: usize, transformer: T) -> Result<Self, PoolError> {
        if workers == 0 {
            return Err(PoolError::NoWorkers);
        }
        if workers > MAX_WORKERS {
            return Err(PoolError::TooManyWorkers { requested: workers, max: MAX_WORKERS });
        }

        let shared = Arc::new(PoolShared {
            quit: AtomicBool::new(false),
            queues: Mutex::new(PoolQueues::default()),
            work_available: Semaphore::new(),
            completion_available: Semaphore::new(),
            key,
            transformer,
        });

        let mut pool = Self {
            shared,
            handles: Vec::with_capacity(workers),
            worker_count: workers,
            torn_down: false,
        };

        for id in 0..workers {
            let shared = Arc::clone(&pool.shared);
            let handle = thread::Builder::new()
                .name(format!("rotxor-worker-{id}"))
                .spawn(move || worker::run(id, shared))
                .map_err(|source| PoolError::Spawn { worker: id, source })?;
            pool.handles.push(handle);
        }

        log::debug!("[POOL] spawned {} workers, block_len={}", workers, pool.shared.key.len());
        Ok(pool)
    }

    pub fn workers(&self) -> usize {
        self.worker_count
    }

    pub fn key(&self) -> &Key {
        &self.shared.key
    }

    /// Append a block to the work queue and wake one worker.
    pub fn submit(&self, block: Block) {
        log::trace!("[POOL] submit block {} ({} bytes)", block.index(), block.len());
        self.shared.lock().work.push(block);
        self.shared.work_available.post();
    }

    /// Block until `count` more blocks have completed.
    ///
    /// Workers only exit after quit is signalled, so a finished worker
    /// thread here means it died mid-block and the batch can never complete.
    pub fn wait_for(&self, count: usize) -> Result<(), PoolError> {
        let mut received = 0;
        while received < count {
            if self.shared.completion_available.wait_timeout(LIVENESS_POLL) {
                received += 1;
                continue;
            }
            if self.handles.iter().any(JoinHandle::is_finished) {
                return Err(PoolError::WorkerExited { pending: count - received });
            }
        }
        Ok(())
    }

    /// Remove every completed block, ascending by index.
    pub fn take_completed(&self) -> Vec<Block> {
        self.shared.lock().completed.take_all()
    }

    /// Signal quit, wake every worker once, join them all, and release any
    /// blocks still queued. Safe to call more than once.
    pub fn shutdown(&mut self) -> Result<(), PoolError> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;

        self.shared.quit.store(true, Ordering::Release);
        for _ in 0..self.handles.len() {
            self.shared.work_available.post();
        }

        let mut panicked = 0;
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                panicked += 1;
            }
        }

        let (pending, completed) = {
            let mut queues = self.shared.lock();
            (queues.work.clear(), queues.completed.clear())
        };
        if pending + completed > 0 {
            log::warn!(
                "[POOL] released {} pending and {} completed blocks at teardown",
                pending,
                completed
            );
        }
        log::debug!("[POOL] shut down");

        if panicked > 0 {
            return Err(PoolError::WorkerPanicked(panicked));
        }
        Ok(())
    }
}

impl<T: BlockTransformer> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("[POOL] teardown failed: {}", e);
        }
    }
}
