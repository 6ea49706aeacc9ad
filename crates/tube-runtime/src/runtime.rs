//! Lifecycle of the background poller.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::detector::DetectionLoop;
use crate::error::{Result, RuntimeError};
use crate::poller::Poller;

/// Spawns the [`Poller`] and stops it on request.
///
/// Other long-running tasks (such as command intake) can subscribe to the
/// same stop signal through [`Runtime::shutdown_signal`].
pub struct Runtime {
    detector: Arc<DetectionLoop>,
    config: RuntimeConfig,
    poll_task: Option<JoinHandle<()>>,
    stop_tx: watch::Sender<bool>,
    // Kept so the channel stays open with no subscribers
    stop_rx: watch::Receiver<bool>,
}

impl Runtime {
    pub fn new(detector: Arc<DetectionLoop>, config: RuntimeConfig) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);

        Self {
            detector,
            config,
            poll_task: None,
            stop_tx,
            stop_rx,
        }
    }

    /// The detection loop driven by this runtime.
    pub fn detector(&self) -> &Arc<DetectionLoop> {
        &self.detector
    }

    /// A receiver that flips to `true` on shutdown, for sibling tasks.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.stop_rx.clone()
    }

    /// Whether the poller task is running.
    pub fn is_running(&self) -> bool {
        self.poll_task.is_some()
    }

    /// Spawns the poller. The first detection cycle starts immediately.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(RuntimeError::AlreadyStarted);
        }

        let mut poller = Poller::new(
            Arc::clone(&self.detector),
            self.config.poll_interval,
            self.stop_rx.clone(),
        );
        self.poll_task = Some(tokio::spawn(async move { poller.run().await }));

        info!(
            channels = self.detector.channels().len(),
            poll_interval_secs = self.config.poll_interval.as_secs(),
            "Notifier runtime started"
        );
        Ok(())
    }

    /// Signals shutdown and waits for the poller to exit.
    ///
    /// A detection cycle already in progress runs to completion first.
    pub async fn shutdown(&mut self) -> Result<()> {
        let task = self.poll_task.take().ok_or(RuntimeError::NotStarted)?;

        info!("Stopping notifier runtime");
        self.stop_tx
            .send(true)
            .map_err(|e| RuntimeError::Shutdown(format!("stop signal not delivered: {}", e)))?;

        debug!("Waiting for in-flight cycle");
        task.await
            .map_err(|e| RuntimeError::Shutdown(format!("poller task failed: {}", e)))?;

        info!("Notifier runtime stopped");
        Ok(())
    }
}
