//! Runtime configuration.

use std::time::Duration;

use tube_core::NotifierConfig;

/// Configuration for the runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How often to check tracked channels.
    pub poll_interval: Duration,
    /// Pause between channels during a `!test123` run.
    pub test_dispatch_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30 * 60),
            test_dispatch_delay: Duration::from_secs(2),
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the scheduling values from the notifier configuration.
    pub fn from_notifier(config: &NotifierConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            test_dispatch_delay: config.test_dispatch_delay,
        }
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the delay between test dispatches.
    pub fn with_test_dispatch_delay(mut self, delay: Duration) -> Self {
        self.test_dispatch_delay = delay;
        self
    }
}
