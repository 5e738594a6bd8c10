//! Supervised task runner racing completion, deadline, and interrupt.
//!
//! A [`Runner`] executes an ordered batch of independent tasks on a
//! background thread while the calling thread waits on three sources at
//! once: the completion slot, a one-shot deadline timer, and an interrupt
//! feed. Tasks run strictly in the order added, one at a time; the interrupt
//! check happens between tasks, which keeps task bodies simple and ignorant
//! of cancellation plumbing.
//!
//! # Interrupt Semantics
//!
//! Exactly one interrupt is "soft": the current task is allowed to finish
//! and the remaining tasks are skipped. A second interrupt while draining
//! escalates to a forced abort, returning immediately. This gives an
//! operator an escape hatch if a task is unexpectedly slow.
//!
//! # Abandonment, Not Cancellation
//!
//! The deadline does not stop an already-started task. On timeout the
//! background thread is abandoned (its eventual outcome is ignored), so
//! task bodies must be designed to be safely abandonable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{after, bounded, never, select};
use tracing::{debug, error, info, warn};

use super::error::RunnerError;
use super::interrupt::InterruptSource;

/// A task executed by a [`Runner`], invoked with its 1-based position in
/// the batch.
type Task = Box<dyn FnOnce(usize) + Send>;

/// Ordered batch of tasks supervised by a deadline and an interrupt source.
///
/// Construct, [`add`](Runner::add) tasks, then call
/// [`start`](Runner::start). `start` consumes the runner, so a batch can
/// only ever run once.
pub struct Runner {
    tasks: Vec<Task>,
    timeout: Duration,
    interrupt: InterruptSource,
}

impl Runner {
    /// Create a runner with the given deadline, interrupted by the
    /// process's Ctrl-C / SIGINT delivery.
    #[cfg(feature = "tokio-runtime")]
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_interrupt(timeout, InterruptSource::ctrl_c())
    }

    /// Create a runner with the given deadline and an injected interrupt
    /// source.
    #[must_use]
    pub fn with_interrupt(timeout: Duration, interrupt: InterruptSource) -> Self {
        Self {
            tasks: Vec::new(),
            timeout,
            interrupt,
        }
    }

    /// Append a task to the batch.
    ///
    /// Tasks execute strictly in the order added, each invoked with its
    /// 1-based position.
    pub fn add<F>(&mut self, task: F) -> &mut Self
    where
        F: FnOnce(usize) + Send + 'static,
    {
        self.tasks.push(Box::new(task));
        self
    }

    /// Number of tasks currently in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Execute the batch, blocking until one of completion, deadline, or
    /// forced interrupt fires.
    ///
    /// The background thread sends exactly one outcome on a single-slot
    /// channel. On timeout this method returns without waiting for the
    /// in-flight task; the thread is abandoned and its outcome discarded.
    ///
    /// # Errors
    ///
    /// - [`RunnerError::Timeout`] if the deadline elapsed before the task
    ///   list completed.
    /// - [`RunnerError::Interrupt`] if an interrupt was observed, whether
    ///   soft-drained or force-aborted.
    pub fn start(self) -> Result<(), RunnerError> {
        let Self {
            tasks,
            timeout,
            interrupt,
        } = self;

        let task_count = tasks.len();
        let interrupted = Arc::new(AtomicBool::new(false));
        let (complete_tx, complete_rx) = bounded::<Result<(), RunnerError>>(1);
        let deadline = after(timeout);

        let flag = Arc::clone(&interrupted);
        thread::Builder::new()
            .name("foreman-runner".into())
            .spawn(move || {
                // Single-slot channel, single send; if the supervisor has
                // already returned, the outcome is deliberately discarded.
                let _ = complete_tx.send(execute_tasks(tasks, &flag));
            })
            .expect("failed to spawn runner thread");

        info!(
            tasks = task_count,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "runner started"
        );

        let mut complete_rx = complete_rx;
        let mut interrupt_rx = interrupt.into_receiver();
        let mut draining = false;

        loop {
            select! {
                recv(complete_rx) -> outcome => {
                    match outcome {
                        Ok(result) => {
                            debug!(ok = result.is_ok(), "runner completed");
                            return result;
                        }
                        Err(_) => {
                            // Task thread died without reporting (task panic).
                            // Keep supervising on the deadline so the caller
                            // still gets a bounded wait.
                            error!("task thread terminated without reporting; waiting for deadline");
                            complete_rx = never();
                        }
                    }
                }
                recv(deadline) -> _ => {
                    warn!("deadline elapsed; abandoning in-flight work");
                    return Err(RunnerError::Timeout);
                }
                recv(interrupt_rx) -> msg => {
                    if msg.is_err() {
                        // Interrupt source disconnected; supervise on
                        // completion and deadline alone.
                        interrupt_rx = never();
                        continue;
                    }
                    if draining {
                        warn!("second interrupt; forcing immediate abort");
                        return Err(RunnerError::Interrupt);
                    }
                    info!("interrupt received; letting current task finish");
                    draining = true;
                    interrupted.store(true, Ordering::Release);
                }
            }
        }
    }
}

/// Run the batch in order, checking the interrupt flag before each task.
fn execute_tasks(tasks: Vec<Task>, interrupted: &AtomicBool) -> Result<(), RunnerError> {
    for (idx, task) in tasks.into_iter().enumerate() {
        let id = idx + 1;
        if interrupted.load(Ordering::Acquire) {
            debug!(task_id = id, "interrupt observed; skipping remaining tasks");
            return Err(RunnerError::Interrupt);
        }
        debug!(task_id = id, "running task");
        task(id);
    }
    Ok(())
}
