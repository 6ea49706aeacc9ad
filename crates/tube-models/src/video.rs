//! Video types.
//!
//! A [`VideoSummary`] is the canonical, platform-independent view of the
//! most recent upload on a tracked channel. It is produced once per fetch
//! and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, VideoId};

/// Videos at or above this many seconds are classified as long.
pub const LONG_VIDEO_THRESHOLD_SECS: u64 = 120;

/// Duration-based classification driving role and template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoKind {
    /// A regular upload (two minutes or more).
    Long,
    /// A short-form upload (under two minutes).
    Short,
}

impl VideoKind {
    /// Classifies a duration. Exactly two minutes counts as long.
    pub fn from_duration(duration_seconds: u64) -> Self {
        if duration_seconds >= LONG_VIDEO_THRESHOLD_SECS {
            Self::Long
        } else {
            Self::Short
        }
    }

    /// Returns true for [`VideoKind::Long`].
    pub fn is_long(self) -> bool {
        matches!(self, Self::Long)
    }
}

/// The most recent public video of a tracked channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    /// Platform identifier, unique per video.
    pub id: VideoId,

    /// Video title.
    pub title: String,

    /// Full video description (may be empty).
    pub description: String,

    /// When the video was published.
    pub published_at: DateTime<Utc>,

    /// Channel that published the video.
    pub channel_id: ChannelId,

    /// Display name of the publishing channel.
    pub channel_title: String,

    /// Duration in whole seconds.
    pub duration_seconds: u64,

    /// Public watch URL.
    pub url: String,

    /// Best available thumbnail.
    pub thumbnail_url: String,

    /// Channel avatar, if the platform returned one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_icon: Option<String>,

    /// View count at fetch time (0 when hidden or absent).
    #[serde(default)]
    pub view_count: u64,
}

impl VideoSummary {
    /// Builds the public watch URL for a video id.
    pub fn watch_url(id: &VideoId) -> String {
        format!("https://www.youtube.com/watch?v={}", id)
    }

    /// Long/short classification of this video.
    pub fn kind(&self) -> VideoKind {
        VideoKind::from_duration(self.duration_seconds)
    }

    /// Human-readable duration (`H:MM:SS` or `M:SS`).
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_seconds)
    }
}

/// Formats seconds as `H:MM:SS` when at least an hour, else `M:SS`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
