//! In-memory fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tube_core::{ChatClient, ChatError, NotificationDispatcher, OutgoingMessage, RoleConfig, SourceError, VideoSource};
use tube_models::{ChannelId, VideoId, VideoSummary};

/// Scripted video source. Channels without a script fail.
#[derive(Default)]
pub struct FakeSource {
    latest: Mutex<HashMap<ChannelId, Option<VideoSummary>>>,
    pub calls: Mutex<Vec<ChannelId>>,
}

impl FakeSource {
    pub fn set_latest(&self, channel: &str, video: Option<VideoSummary>) {
        self.latest.lock().unwrap().insert(ChannelId::from(channel), video);
    }

    pub fn set_failing(&self, channel: &str) {
        self.latest.lock().unwrap().remove(&ChannelId::from(channel));
    }
}

#[async_trait]
impl VideoSource for FakeSource {
    async fn latest_video(&self, channel: &ChannelId) -> Result<Option<VideoSummary>, SourceError> {
        self.calls.lock().unwrap().push(channel.clone());
        self.latest
            .lock()
            .unwrap()
            .get(channel)
            .cloned()
            .ok_or_else(|| SourceError::Request("connection refused".to_string()))
    }
}

/// Chat client that records every message.
#[derive(Default)]
pub struct RecordingChat {
    pub sent: Mutex<Vec<(String, OutgoingMessage)>>,
    pub fail: Mutex<bool>,
}

impl RecordingChat {
    pub fn messages(&self) -> Vec<(String, OutgoingMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn contents(&self) -> Vec<String> {
        self.messages().into_iter().map(|(_, m)| m.content).collect()
    }

    /// Messages that carry a card, i.e. notifications.
    pub fn notifications(&self) -> Vec<OutgoingMessage> {
        self.messages()
            .into_iter()
            .filter_map(|(_, m)| m.card.is_some().then_some(m))
            .collect()
    }
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn send_message(&self, channel_id: &str, message: OutgoingMessage) -> Result<(), ChatError> {
        if *self.fail.lock().unwrap() {
            return Err(ChatError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push((channel_id.to_string(), message));
        Ok(())
    }

    fn role_mention(&self, role_id: &str) -> String {
        format!("<@&{}>", role_id)
    }
}

pub fn video(channel: &str, id: &str, duration_seconds: u64) -> VideoSummary {
    let id = VideoId::from(id);
    VideoSummary {
        url: VideoSummary::watch_url(&id),
        title: format!("Video {}", id),
        id,
        description: "About this video".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        channel_id: ChannelId::from(channel),
        channel_title: format!("Title of {}", channel),
        duration_seconds,
        thumbnail_url: "https://i.ytimg.com/hq.jpg".to_string(),
        channel_icon: None,
        view_count: 10,
    }
}

pub fn dispatcher(chat: Arc<RecordingChat>) -> Arc<NotificationDispatcher> {
    Arc::new(NotificationDispatcher::new(
        chat,
        "target",
        RoleConfig {
            long_video: "LONG".to_string(),
            short_video: "SHORT".to_string(),
        },
        "brand",
    ))
}

pub fn channels() -> Vec<ChannelId> {
    vec![ChannelId::from("UC_a"), ChannelId::from("UC_b")]
}
