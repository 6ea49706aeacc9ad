//! Persistence layer for the YouTube notifier.
//!
//! This crate keeps the "last notified video per channel" map on disk using
//! atomic file operations (write to a temp file, then rename), so a crash
//! mid-write never leaves a file that cannot be loaded.
//!
//! # Example
//!
//! ```no_run
//! use tube_persistence::WatchStateStore;
//! use tube_models::{ChannelId, VideoId};
//!
//! let mut store = WatchStateStore::load("/var/lib/tube/lastVideos.json");
//! let channel = ChannelId::from("UCxyz");
//!
//! if store.get(&channel).is_none() {
//!     store.set_and_persist(&channel, VideoId::from("abc")).unwrap();
//! }
//! ```

pub mod atomic;
pub mod error;
pub mod state_store;

pub use error::{PersistenceError, Result};
pub use state_store::{PersistedStateMap, WatchStateStore};
