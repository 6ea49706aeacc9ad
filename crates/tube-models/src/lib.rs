//! Core data models for the YouTube notifier.
//!
//! This crate provides the plain data types shared by every other crate in
//! the workspace: identifiers for tracked channels and videos, the
//! normalized [`VideoSummary`] produced by each fetch, the rich [`Card`]
//! attached to notifications, and the rows of the operator status report.

pub mod card;
pub mod ids;
pub mod status;
pub mod video;

// Re-export main types
pub use card::{Card, CardAuthor};
pub use ids::{ChannelId, VideoId};
pub use status::ChannelStatus;
pub use video::{format_duration, VideoKind, VideoSummary, LONG_VIDEO_THRESHOLD_SECS};
