//! Status report rows for the `!status` command.

use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, VideoId};

/// Comparison between the stored baseline and the live latest video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStatus {
    pub channel_id: ChannelId,
    pub channel_title: String,
    pub latest_title: String,
    pub latest_id: VideoId,
    /// Baseline currently persisted for the channel.
    pub stored_id: Option<VideoId>,
}

impl ChannelStatus {
    /// True when the stored id differs from the fetched one.
    ///
    /// A missing baseline also counts as pending.
    pub fn is_pending(&self) -> bool {
        self.stored_id.as_ref() != Some(&self.latest_id)
    }
}
