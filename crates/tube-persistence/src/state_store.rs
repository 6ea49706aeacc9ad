//! Durable "last notified video" map.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use tube_models::{ChannelId, VideoId};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::Result;

/// On-disk shape: `{ "<channelId>": "<videoId>" | null }`.
pub type PersistedStateMap = BTreeMap<ChannelId, Option<VideoId>>;

/// Owns the per-channel baseline and its durable copy.
///
/// The file is written whole on every mutation:
/// ```text
/// {
///   "UCabc": "dQw4w9WgXcQ",
///   "UCdef": null
/// }
/// ```
/// The in-memory map may run ahead of the file if a write fails; the next
/// successful write brings them back in line.
#[derive(Debug)]
pub struct WatchStateStore {
    path: PathBuf,
    entries: PersistedStateMap,
}

impl WatchStateStore {
    /// Creates an empty store bound to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: PersistedStateMap::new(),
        }
    }

    /// Loads the store from `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty store. That is
    /// the same as a first run, so it is logged and never fatal.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match read_json_optional::<PersistedStateMap>(&path) {
            Ok(Some(mut entries)) => {
                // Blank ids count as "never observed"
                for id in entries.values_mut() {
                    if id.as_ref().is_some_and(|v| v.as_str().is_empty()) {
                        *id = None;
                    }
                }
                info!(path = %path.display(), channels = entries.len(), "Loaded video state");
                entries
            }
            Ok(None) => {
                info!(path = %path.display(), "No video state file, starting empty");
                PersistedStateMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load video state, starting empty");
                PersistedStateMap::new()
            }
        };

        Self { path, entries }
    }

    /// Path of the durable copy.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last notified video for a channel, `None` if never observed.
    pub fn get(&self, channel: &ChannelId) -> Option<&VideoId> {
        self.entries.get(channel).and_then(|id| id.as_ref())
    }

    /// Read-only view of the whole map.
    pub fn entries(&self) -> &PersistedStateMap {
        &self.entries
    }

    /// Adds a null entry for every channel not yet present.
    ///
    /// In-memory only; the entries reach disk with the next write. Returns
    /// the number of entries added.
    pub fn ensure_channels(&mut self, channels: &[ChannelId]) -> usize {
        let mut added = 0;
        for channel in channels {
            if !self.entries.contains_key(channel) {
                self.entries.insert(channel.clone(), None);
                added += 1;
            }
        }
        if added > 0 {
            debug!(added, "Seeded untracked channels with empty baseline");
        }
        added
    }

    /// Records `video` as the channel's baseline and writes the full map.
    ///
    /// The in-memory update happens even when the write fails.
    pub fn set_and_persist(&mut self, channel: &ChannelId, video: VideoId) -> Result<()> {
        self.entries.insert(channel.clone(), Some(video));
        self.persist()
    }

    /// Resets the baseline of every given channel to null and writes once.
    ///
    /// Entries for channels outside `channels` are dropped.
    pub fn reset_all(&mut self, channels: &[ChannelId]) -> Result<()> {
        self.entries = channels.iter().map(|c| (c.clone(), None)).collect();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        atomic_write_json(&self.path, &self.entries)?;
        debug!(path = %self.path.display(), "Saved video state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn channels() -> Vec<ChannelId> {
        vec![ChannelId::from("UC_one"), ChannelId::from("UC_two")]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = WatchStateStore::load(dir.path().join("lastVideos.json"));

        assert!(store.entries().is_empty());
        assert!(store.get(&ChannelId::from("UC_one")).is_none());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lastVideos.json");
        fs::write(&path, "not json at all").unwrap();

        let store = WatchStateStore::load(&path);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_set_and_persist_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lastVideos.json");
        let [one, two] = [ChannelId::from("UC_one"), ChannelId::from("UC_two")];

        let mut store = WatchStateStore::load(&path);
        store.ensure_channels(&channels());
        store.set_and_persist(&one, VideoId::from("v1")).unwrap();

        let reloaded = WatchStateStore::load(&path);
        assert_eq!(reloaded.entries(), store.entries());
        assert_eq!(reloaded.get(&one), Some(&VideoId::from("v1")));
        assert!(reloaded.get(&two).is_none());
        assert!(reloaded.entries().contains_key(&two));
    }

    #[test]
    fn test_file_format_is_flat_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lastVideos.json");

        let mut store = WatchStateStore::new(&path);
        store.ensure_channels(&channels());
        store
            .set_and_persist(&ChannelId::from("UC_one"), VideoId::from("v1"))
            .unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "UC_one": "v1", "UC_two": null }));
    }

    #[test]
    fn test_blank_ids_load_as_null() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lastVideos.json");
        fs::write(&path, r#"{"UC_one": "", "UC_two": "v9"}"#).unwrap();

        let store = WatchStateStore::load(&path);
        assert!(store.get(&ChannelId::from("UC_one")).is_none());
        assert_eq!(store.get(&ChannelId::from("UC_two")), Some(&VideoId::from("v9")));
    }

    #[test]
    fn test_ensure_channels_keeps_existing() {
        let dir = tempdir().unwrap();
        let mut store = WatchStateStore::new(dir.path().join("s.json"));
        let one = ChannelId::from("UC_one");

        store.set_and_persist(&one, VideoId::from("v1")).unwrap();
        let added = store.ensure_channels(&channels());

        assert_eq!(added, 1);
        assert_eq!(store.get(&one), Some(&VideoId::from("v1")));
    }

    #[test]
    fn test_reset_all_clears_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lastVideos.json");

        let mut store = WatchStateStore::new(&path);
        store.set_and_persist(&ChannelId::from("UC_one"), VideoId::from("v1")).unwrap();
        store.set_and_persist(&ChannelId::from("UC_old"), VideoId::from("v7")).unwrap();
        store.reset_all(&channels()).unwrap();

        let reloaded = WatchStateStore::load(&path);
        assert_eq!(reloaded.entries().len(), 2);
        assert!(reloaded.entries().values().all(Option::is_none));
    }

    #[test]
    fn test_write_failure_still_updates_memory() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let mut store = WatchStateStore::new(&path);
        let one = ChannelId::from("UC_one");
        assert!(store.set_and_persist(&one, VideoId::from("v1")).is_err());
        assert_eq!(store.get(&one), Some(&VideoId::from("v1")));
    }
}
