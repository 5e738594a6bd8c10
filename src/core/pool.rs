//! Bounded worker pool with rendezvous hand-off.
//!
//! The pool spawns a fixed set of dedicated OS threads at construction. The
//! only synchronization primitive is a zero-capacity channel: a submission
//! completes exactly when an idle worker receives it, which gives exact-N
//! concurrency with no separate counting semaphore and no unbounded queue
//! growth.
//!
//! # Design Principles
//!
//! - **No polling**: workers block on channel recv; submitters block on the
//!   rendezvous send
//! - **Accept, not complete**: [`WorkerPool::run`] returns once a worker has
//!   taken the unit, not when the unit finishes
//! - **Clean shutdown**: dropping the sender unblocks idle workers naturally;
//!   [`WorkerPool::shutdown`] then joins every worker

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::PoolConfig;

use super::error::PoolError;

/// A unit of work that can be executed by a pool worker.
///
/// The pool invokes [`Worker::task`] synchronously on a worker thread,
/// exactly once. Errors and panics inside a task are the caller's
/// responsibility; a propagating panic terminates that worker loop.
///
/// Any `FnOnce() + Send` closure is a `Worker` via the blanket impl.
pub trait Worker: Send {
    /// Execute the unit of work. Consumed on first call.
    fn task(self: Box<Self>);
}

impl<F> Worker for F
where
    F: FnOnce() + Send,
{
    fn task(self: Box<Self>) {
        (*self)();
    }
}

/// Statistics about pool hand-off activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolStats {
    /// Number of worker threads.
    pub capacity: usize,
    /// Units of work accepted by a worker so far.
    pub accepted: u64,
    /// Units of work whose `task()` has returned.
    pub completed: u64,
}

/// Internal counters for pool statistics (thread-safe).
#[derive(Debug, Default)]
struct PoolCounters {
    accepted: AtomicU64,
    completed: AtomicU64,
}

/// Worker pool with a fixed set of dedicated OS threads.
///
/// At most `capacity` units of work run concurrently. [`WorkerPool::run`]
/// blocks the submitter until a worker accepts the hand-off; this is the
/// backpressure mechanism. There is no queue beyond the in-flight rendezvous,
/// so blocked submitters are the only buffering.
///
/// The pool makes no ordering guarantee among submitted units beyond
/// "accepted in the order workers become available".
pub struct WorkerPool {
    /// Hand-off sender. `None` once shutdown has begun.
    work_tx: Mutex<Option<Sender<Box<dyn Worker>>>>,
    /// Shutdown latch; makes `shutdown` idempotent.
    shutdown: AtomicBool,
    /// Worker thread handles, drained on shutdown.
    workers: Mutex<Vec<JoinHandle<()>>>,
    /// Hand-off counters shared with the worker loops.
    counters: Arc<PoolCounters>,
    /// Number of worker threads; fixed at construction.
    capacity: usize,
}

impl WorkerPool {
    /// Create a pool with `capacity` worker threads and default thread
    /// settings.
    ///
    /// All workers are running and ready to accept hand-offs when this
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, PoolError> {
        Self::with_config(&PoolConfig::new().with_capacity(capacity))
    }

    /// Create a pool from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn with_config(config: &PoolConfig) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidConfig)?;

        // Zero capacity means send and recv must rendezvous: the hand-off.
        let (work_tx, work_rx) = bounded::<Box<dyn Worker>>(0);
        let counters = Arc::new(PoolCounters::default());

        let mut workers = Vec::with_capacity(config.capacity);
        for worker_id in 0..config.capacity {
            workers.push(spawn_worker(
                worker_id,
                work_rx.clone(),
                Arc::clone(&counters),
                config,
            ));
        }

        info!(
            capacity = config.capacity,
            thread_name_prefix = %config.thread_name_prefix,
            "worker pool initialized"
        );

        Ok(Self {
            work_tx: Mutex::new(Some(work_tx)),
            shutdown: AtomicBool::new(false),
            workers: Mutex::new(workers),
            counters,
            capacity: config.capacity,
        })
    }

    /// Submit a unit of work, blocking until an idle worker accepts it.
    ///
    /// Returns after the unit has been *accepted*, not after it completes.
    /// Callers that need completion notification must coordinate externally,
    /// for example with a counting barrier.
    ///
    /// A submission that is already blocked in the hand-off when
    /// [`WorkerPool::shutdown`] begins is still accepted and executed before
    /// shutdown finishes.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] if the pool has been shut down.
    pub fn run<W>(&self, worker: W) -> Result<(), PoolError>
    where
        W: Worker + 'static,
    {
        // Clone the sender out so the lock is not held across the blocking
        // send; shutdown needs the same lock to close the slot.
        let work_tx = {
            let guard = self.work_tx.lock();
            match guard.as_ref() {
                Some(tx) => tx.clone(),
                None => return Err(PoolError::Closed),
            }
        };

        work_tx
            .send(Box::new(worker))
            .map_err(|_| PoolError::Closed)?;

        self.counters.accepted.fetch_add(1, Ordering::Relaxed);
        debug!("unit of work handed off");
        Ok(())
    }

    /// Shut down the pool, waiting for all accepted work to finish.
    ///
    /// Drops the hand-off sender so idle workers see a disconnected channel
    /// and exit, then joins every worker thread. Returns only after all
    /// `capacity` workers have exited, which in turn happens only after every
    /// accepted unit's `task()` has returned.
    ///
    /// Idempotent: a second call returns immediately.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        info!("shutting down worker pool");

        {
            let mut work_tx = self.work_tx.lock();
            *work_tx = None;
        }

        let mut workers = self.workers.lock();
        for (worker_id, handle) in workers.drain(..).enumerate() {
            if handle.join().is_err() {
                warn!(worker_id, "worker panicked during task execution");
            }
        }

        info!(capacity = self.capacity, "worker pool drained");
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of hand-off counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            accepted: self.counters.accepted.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Signal shutdown but don't join workers in Drop; this prevents
        // hangs when a pool is dropped with tasks still running. Explicit
        // shutdown() is required for graceful draining.
        if !self.shutdown.swap(true, Ordering::AcqRel) {
            let mut work_tx = self.work_tx.lock();
            *work_tx = None;
            debug!("worker pool dropped without explicit shutdown; workers detached");
        }
    }
}

/// Spawn one worker loop on a dedicated, named OS thread.
fn spawn_worker(
    worker_id: usize,
    work_rx: Receiver<Box<dyn Worker>>,
    counters: Arc<PoolCounters>,
    config: &PoolConfig,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name(format!("{}-{worker_id}", config.thread_name_prefix))
        .stack_size(config.thread_stack_size)
        .spawn(move || {
            debug!(worker_id, "worker started");

            // Blocking recv is the rendezvous point: completing it is what
            // unblocks exactly one submitter. When the last sender is
            // dropped, recv returns Err and the loop exits.
            while let Ok(work) = work_rx.recv() {
                work.task();
                counters.completed.fetch_add(1, Ordering::Relaxed);
            }

            debug!(worker_id, "worker channel closed, exiting");
        })
        .expect("failed to spawn worker thread")
}
