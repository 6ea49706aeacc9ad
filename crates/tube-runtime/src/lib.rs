//! Runtime for the YouTube notifier.
//!
//! This crate provides the moving parts that sit on top of `tube-core`:
//! - `DetectionLoop` - decides, per channel, whether the latest video is new
//! - `CommandHandler` - answers the `!test123`, `!reset` and `!status` commands
//! - `Poller` - runs the detection loop on an interval until shutdown
//! - `Runtime` - spawns the poller and stops it gracefully
//!
//! # Example
//!
//! ```ignore
//! use tube_runtime::{shared_store, DetectionLoop, Runtime, RuntimeConfig};
//! use tube_persistence::WatchStateStore;
//! use std::sync::Arc;
//!
//! let store = shared_store(WatchStateStore::load(&config.state_file));
//! let detector = Arc::new(DetectionLoop::new(source, store, dispatcher, channels));
//!
//! let mut runtime = Runtime::new(detector, RuntimeConfig::default());
//! runtime.start()?;
//! tokio::signal::ctrl_c().await?;
//! runtime.shutdown().await?;
//! ```
//!
//! # State ownership
//!
//! The `WatchStateStore` lives behind one async mutex shared by the
//! detection loop and the command handler. The loop holds the lock from
//! reading a channel's baseline until the new baseline is persisted, so a
//! concurrent `!reset` lands either before or after a channel's update,
//! never in the middle of it.

pub mod commands;
pub mod config;
pub mod detector;
pub mod error;
pub mod poller;
pub mod runtime;

#[cfg(test)]
mod test_support;

pub use commands::{render_status, CommandHandler, OperatorCommand, StatusEntry};
pub use config::RuntimeConfig;
pub use detector::{decide, ChannelOutcome, Decision, DetectionLoop, PollReport};
pub use error::{Result, RuntimeError};
pub use poller::Poller;
pub use runtime::Runtime;

use std::sync::Arc;
use tokio::sync::Mutex;
use tube_persistence::WatchStateStore;

/// The single owned state object shared by every task.
pub type SharedStore = Arc<Mutex<WatchStateStore>>;

/// Wraps a store for sharing between the poller and command handler.
pub fn shared_store(store: WatchStateStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}
