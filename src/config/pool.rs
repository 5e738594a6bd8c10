//! Worker pool configuration.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Default stack size for worker threads: 2 MiB.
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;

fn default_stack_size() -> usize {
    DEFAULT_STACK_SIZE
}

fn default_thread_name_prefix() -> String {
    "foreman-worker".into()
}

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of worker threads; fixed for the lifetime of the pool.
    pub capacity: usize,
    /// Stack size for each worker thread, in bytes.
    #[serde(default = "default_stack_size")]
    pub thread_stack_size: usize,
    /// Prefix for worker thread names; the worker index is appended.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

impl PoolConfig {
    /// Configuration with one worker per logical CPU and default thread
    /// settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacity: num_cpus::get(),
            thread_stack_size: default_stack_size(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }

    /// Set the number of worker threads.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the worker thread stack size in bytes.
    #[must_use]
    pub fn with_thread_stack_size(mut self, bytes: usize) -> Self {
        self.thread_stack_size = bytes;
        self
    }

    /// Set the worker thread name prefix.
    #[must_use]
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.thread_stack_size == 0 {
            return Err("thread_stack_size must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse a pool configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON or fails validation.
    pub fn from_json_str(input: &str) -> AppResult<Self> {
        let cfg: Self =
            serde_json::from_str(input).context("failed to parse pool configuration")?;
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}
