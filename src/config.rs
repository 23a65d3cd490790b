//! Configuration Module
//!
//! Expiry delay and sweep interval for an [`ExpiryMap`](crate::ExpiryMap),
//! loadable from environment variables or any serde format.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ExpiryError, Result};

/// Default expiry delay (5 minutes)
const DEFAULT_EXPIRY_DELAY: Duration = Duration::from_secs(300);
/// Default sweep interval (1 second)
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Expiry map configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long an entry lives after its last write
    pub expiry_delay: Duration,
    /// Period between background sweeps
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// A convenience for host applications that configure their maps from the
    /// environment. The map itself never reads the environment; it only sees
    /// the durations passed to its constructor.
    ///
    /// # Environment Variables
    /// - `EXPIRY_DELAY_MS` - Expiry delay in milliseconds (default: 300000)
    /// - `SWEEP_INTERVAL_MS` - Sweep interval in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        Self {
            expiry_delay: env_millis("EXPIRY_DELAY_MS").unwrap_or(DEFAULT_EXPIRY_DELAY),
            sweep_interval: env_millis("SWEEP_INTERVAL_MS").unwrap_or(DEFAULT_SWEEP_INTERVAL),
        }
    }

    /// Sets the expiry delay.
    pub fn with_expiry_delay(mut self, expiry_delay: Duration) -> Self {
        self.expiry_delay = expiry_delay;
        self
    }

    /// Sets the sweep interval.
    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Checks the config can drive a sweep task.
    ///
    /// A zero expiry delay is accepted and means "expire on the next sweep".
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(ExpiryError::InvalidSweepInterval(self.sweep_interval));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expiry_delay: DEFAULT_EXPIRY_DELAY,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
}
