//! Configuration models for pools and runners.

pub mod pool;
pub mod runner;

pub use pool::PoolConfig;
pub use runner::RunnerConfig;
