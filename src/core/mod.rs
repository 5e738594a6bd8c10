//! Core coordination primitives: worker pool, runner, interrupt sources.

pub mod error;
pub mod interrupt;
pub mod pool;
pub mod runner;

pub use error::{AppResult, PoolError, RunnerError};
pub use interrupt::{InterruptSource, InterruptTrigger};
pub use pool::{PoolStats, Worker, WorkerPool};
pub use runner::Runner;
