//! Runner configuration.

use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;

/// Runner configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Deadline for the whole batch, in milliseconds.
    pub timeout_ms: u64,
}

impl RunnerConfig {
    /// Configuration with the given deadline in milliseconds.
    #[must_use]
    pub const fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    /// The configured deadline as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse a runner configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON or fails validation.
    pub fn from_json_str(input: &str) -> AppResult<Self> {
        let cfg: Self =
            serde_json::from_str(input).context("failed to parse runner configuration")?;
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
