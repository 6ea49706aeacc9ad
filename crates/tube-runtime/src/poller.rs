//! Interval scheduler for the detection loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::detector::DetectionLoop;

/// Runs the detection loop once immediately, then on every tick.
///
/// A cycle always runs to completion before the next one can start; ticks
/// missed while a cycle was running are not replayed.
pub struct Poller {
    detector: Arc<DetectionLoop>,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl Poller {
    /// Creates a new poller.
    pub fn new(
        detector: Arc<DetectionLoop>,
        poll_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            detector,
            poll_interval,
            shutdown,
        }
    }

    /// Run the polling loop until shutdown signal.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Automatic video check enabled"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.detector.poll().await;
                    debug!(notified = report.notified(), "Scheduled poll complete");
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        debug!("poller received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("poller stopped");
    }
}
