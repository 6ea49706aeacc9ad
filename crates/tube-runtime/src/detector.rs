//! New-video detection.
//!
//! For each tracked channel, in order:
//! 1. fetch the latest video (failure or nothing found: skip the channel)
//! 2. compare its id with the stored baseline
//! 3. no baseline: record the id without notifying (first observation)
//! 4. different id: notify, then record the id
//! 5. same id: nothing to do
//!
//! Channels are processed sequentially so the outbound request rate stays
//! bounded and there is only ever one writer per cycle.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use tube_core::format::NotifyMode;
use tube_core::{NotificationDispatcher, VideoSource};
use tube_models::{ChannelId, VideoId, VideoSummary};
use tube_persistence::WatchStateStore;

use crate::SharedStore;

/// What to do with a freshly fetched latest video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No baseline yet: record it silently.
    Baseline,
    /// The video differs from the baseline: announce it.
    Notify,
    /// The video is the baseline: nothing changed.
    UpToDate,
}

/// Applies the novelty and first-observation rules.
pub fn decide(previous: Option<&VideoId>, latest: &VideoId) -> Decision {
    match previous {
        None => Decision::Baseline,
        Some(prev) if prev == latest => Decision::UpToDate,
        Some(_) => Decision::Notify,
    }
}

/// Result of polling one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    /// The fetch failed; state untouched.
    FetchFailed(String),
    /// The platform reported no video; state untouched.
    NoVideo,
    /// First observation recorded without a notification.
    Baseline(VideoId),
    /// A new video was announced and recorded.
    Notified { video: VideoId, delivered: bool },
    /// The latest video is already the baseline.
    UpToDate,
}

/// Per-channel outcomes of one poll cycle, in polling order.
#[derive(Debug, Default, Clone)]
pub struct PollReport {
    pub outcomes: Vec<(ChannelId, ChannelOutcome)>,
}

impl PollReport {
    /// Number of channels for which a notification was dispatched.
    pub fn notified(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ChannelOutcome::Notified { .. }))
            .count()
    }

    /// Number of channels skipped because the fetch failed or was empty.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ChannelOutcome::FetchFailed(_) | ChannelOutcome::NoVideo))
            .count()
    }

    /// Outcome recorded for `channel`, if it was polled.
    pub fn outcome(&self, channel: &ChannelId) -> Option<&ChannelOutcome> {
        self.outcomes.iter().find(|(c, _)| c == channel).map(|(_, o)| o)
    }
}

/// Orchestrates video source, state store and dispatcher.
pub struct DetectionLoop {
    source: Arc<dyn VideoSource>,
    store: SharedStore,
    dispatcher: Arc<NotificationDispatcher>,
    channels: Vec<ChannelId>,
}

impl DetectionLoop {
    pub fn new(
        source: Arc<dyn VideoSource>,
        store: SharedStore,
        dispatcher: Arc<NotificationDispatcher>,
        channels: Vec<ChannelId>,
    ) -> Self {
        Self {
            source,
            store,
            dispatcher,
            channels,
        }
    }

    /// Tracked channels, in polling order.
    pub fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    /// Polls every tracked channel once.
    pub async fn poll(&self) -> PollReport {
        self.poll_channels(&self.channels).await
    }

    /// Polls the given channels once, in order.
    pub async fn poll_channels(&self, channels: &[ChannelId]) -> PollReport {
        info!(channels = channels.len(), "Checking for new videos");

        let mut report = PollReport::default();
        for channel in channels {
            let outcome = self.poll_channel(channel).await;
            report.outcomes.push((channel.clone(), outcome));
        }

        debug!(
            notified = report.notified(),
            skipped = report.skipped(),
            "Poll cycle finished"
        );
        report
    }

    async fn poll_channel(&self, channel: &ChannelId) -> ChannelOutcome {
        let latest = match self.source.latest_video(channel).await {
            Ok(Some(video)) => video,
            Ok(None) => {
                warn!(channel_id = %channel, "No video found for channel");
                return ChannelOutcome::NoVideo;
            }
            Err(e) => {
                warn!(channel_id = %channel, error = %e, "Failed to fetch latest video");
                return ChannelOutcome::FetchFailed(e.to_string());
            }
        };

        // Held until the new baseline is persisted
        let mut store = self.store.lock().await;
        let previous = store.get(channel).cloned();

        match decide(previous.as_ref(), &latest.id) {
            Decision::UpToDate => {
                debug!(channel_id = %channel, video_id = %latest.id, "No new video");
                ChannelOutcome::UpToDate
            }
            Decision::Baseline => {
                info!(
                    channel_id = %channel,
                    video_id = %latest.id,
                    title = %latest.title,
                    "First video observed, recording baseline without notifying"
                );
                record(&mut store, channel, &latest);
                ChannelOutcome::Baseline(latest.id)
            }
            Decision::Notify => {
                info!(
                    channel_id = %channel,
                    video_id = %latest.id,
                    previous = ?previous.as_ref().map(VideoId::as_str),
                    title = %latest.title,
                    "New video detected"
                );
                let delivered = self.dispatcher.dispatch(&latest, NotifyMode::Live).await;
                // Recorded even when the send failed
                record(&mut store, channel, &latest);
                ChannelOutcome::Notified {
                    video: latest.id,
                    delivered,
                }
            }
        }
    }
}

fn record(store: &mut WatchStateStore, channel: &ChannelId, video: &VideoSummary) {
    match store.set_and_persist(channel, video.id.clone()) {
        Ok(()) => debug!(channel_id = %channel, video_id = %video.id, "Updated last video"),
        Err(e) => error!(
            channel_id = %channel,
            video_id = %video.id,
            error = %e,
            "Failed to persist last video, in-memory state is ahead of disk"
        ),
    }
}
