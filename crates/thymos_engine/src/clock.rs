//! Clock configuration for the simulation engine
//!
//! The tick interval is a fixed design constant per engine instance; it
//! is never derived from data volume or adjusted at runtime.

use std::time::Duration;
use thymos_core::ThymosConfig;

/// Configuration for the periodic simulation clock.
#[derive(Debug, Clone)]
pub struct ClockConfig {
    /// How often a decay tick fires while the clock is running
    /// (default: 1000ms).
    pub interval: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
        }
    }
}

impl ClockConfig {
    /// Fast cadence for interactive demos.
    pub fn fast() -> Self {
        Self {
            interval: Duration::from_millis(200),
        }
    }

    /// Slow cadence for resource-constrained hosts.
    pub fn slow() -> Self {
        Self {
            interval: Duration::from_millis(2000),
        }
    }

    /// Very fast cadence for testing.
    pub fn testing() -> Self {
        Self {
            interval: Duration::from_millis(10),
        }
    }

    pub fn from_config(config: &ThymosConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.clock.interval_ms.max(1)),
        }
    }
}
