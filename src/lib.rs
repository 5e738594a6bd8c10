//! # Foreman
//!
//! Bounded worker pool and deadline-supervised task runner primitives.
//!
//! This library provides two small, independent coordination primitives for
//! thread-based workloads. Neither depends on the other; a caller may combine
//! them, but each solves exactly one problem.
//!
//! ## Core Problems Solved
//!
//! - **Bounded concurrent execution**: run arbitrary units of work across a
//!   fixed number of worker threads. Submission blocks until an idle worker
//!   accepts the hand-off, so no more than `capacity` units ever run at once
//!   and there is no hidden queue that can grow without bound.
//! - **Supervised batch execution**: run an ordered list of tasks on a
//!   background thread while the caller races completion against a fixed
//!   deadline and an operator interrupt. One interrupt drains gracefully
//!   (the current task finishes, the rest are skipped); a second interrupt
//!   forces an immediate return.
//!
//! ## WorkerPool - Backpressure by Rendezvous
//!
//! The pool's only synchronization primitive is a zero-capacity hand-off
//! channel: a send completes only when a worker is simultaneously receiving.
//! [`crate::core::WorkerPool::run`] therefore returns once the unit has been
//! *accepted*, not when it completes - callers needing completion
//! notification must coordinate externally.
//!
//! ```rust,ignore
//! use foreman::core::WorkerPool;
//!
//! let pool = WorkerPool::new(4)?;
//!
//! for name in ["steve", "bob", "mary"] {
//!     // Blocks while all 4 workers are busy.
//!     pool.run(move || println!("processing {name}"))?;
//! }
//!
//! // Waits for every accepted unit to finish.
//! pool.shutdown();
//! ```
//!
//! ## Runner - Deadline and Interrupt Racing
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use foreman::core::{Runner, RunnerError};
//!
//! let mut runner = Runner::new(Duration::from_secs(4));
//! runner.add(|id| println!("task #{id}"));
//! runner.add(|id| println!("task #{id}"));
//!
//! match runner.start() {
//!     Ok(()) => println!("all tasks finished"),
//!     Err(RunnerError::Timeout) => std::process::exit(1),
//!     Err(RunnerError::Interrupt) => std::process::exit(2),
//! }
//! ```
//!
//! The runner's timeout is not cooperative cancellation: an in-flight task is
//! abandoned, never killed, so task bodies must be safe to abandon. OS signal
//! delivery is abstracted behind [`crate::core::InterruptSource`] so tests
//! can deliver synthetic interrupts deterministically.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core coordination primitives: worker pool, runner, interrupt sources.
pub mod core;
/// Configuration models for pools and runners.
pub mod config;
/// Shared utilities.
pub mod util;
