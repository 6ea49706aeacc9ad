//! Notification dispatch.

use std::sync::Arc;

use tracing::{error, info};
use tube_models::{VideoKind, VideoSummary};

use crate::chat::{ChatClient, OutgoingMessage};
use crate::config::{NotifierConfig, RoleConfig};
use crate::format::{build_card, render_text, NotifyMode};

/// Renders a video into a message and posts it to the target channel.
///
/// Dispatch never touches notification state and never fails outward: a
/// send error is logged and reported as `false`.
pub struct NotificationDispatcher {
    chat: Arc<dyn ChatClient>,
    target_channel: String,
    roles: RoleConfig,
    footer_brand: String,
}

impl NotificationDispatcher {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        target_channel: impl Into<String>,
        roles: RoleConfig,
        footer_brand: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            target_channel: target_channel.into(),
            roles,
            footer_brand: footer_brand.into(),
        }
    }

    /// Creates a dispatcher from the notifier configuration.
    pub fn from_config(chat: Arc<dyn ChatClient>, config: &NotifierConfig) -> Self {
        Self::new(
            chat,
            config.target_channel_id.clone(),
            config.roles.clone(),
            config.footer_brand.clone(),
        )
    }

    /// Builds the outgoing message without sending it.
    pub fn compose(&self, video: &VideoSummary, mode: NotifyMode) -> OutgoingMessage {
        let role = match video.kind() {
            VideoKind::Long => &self.roles.long_video,
            VideoKind::Short => &self.roles.short_video,
        };
        let mention = self.chat.role_mention(role);

        OutgoingMessage::with_card(
            render_text(video, &mention, mode),
            build_card(video, &self.footer_brand),
        )
    }

    /// Sends the notification for `video`. Returns whether it was delivered.
    pub async fn dispatch(&self, video: &VideoSummary, mode: NotifyMode) -> bool {
        let message = self.compose(video, mode);
        let test = mode == NotifyMode::Test;

        match self.chat.send_message(&self.target_channel, message).await {
            Ok(()) => {
                info!(
                    video_id = %video.id,
                    title = %video.title,
                    test,
                    "Notification sent"
                );
                true
            }
            Err(e) => {
                error!(video_id = %video.id, error = %e, "Failed to send notification");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use tube_models::{ChannelId, VideoId};

    #[derive(Default)]
    struct RecordingChat {
        sent: Mutex<Vec<(String, OutgoingMessage)>>,
        fail: bool,
    }

    #[async_trait]
    impl ChatClient for RecordingChat {
        async fn send_message(&self, channel_id: &str, message: OutgoingMessage) -> Result<(), ChatError> {
            if self.fail {
                return Err(ChatError::Request("offline".to_string()));
            }
            self.sent.lock().unwrap().push((channel_id.to_string(), message));
            Ok(())
        }

        fn role_mention(&self, role_id: &str) -> String {
            format!("<@&{}>", role_id)
        }
    }

    fn roles() -> RoleConfig {
        RoleConfig {
            long_video: "L".to_string(),
            short_video: "S".to_string(),
        }
    }

    fn video(duration_seconds: u64) -> VideoSummary {
        VideoSummary {
            id: VideoId::from("v1"),
            title: "Title".to_string(),
            description: String::new(),
            published_at: Utc::now(),
            channel_id: ChannelId::from("UC1"),
            channel_title: "Chan".to_string(),
            duration_seconds,
            url: "https://www.youtube.com/watch?v=v1".to_string(),
            thumbnail_url: String::new(),
            channel_icon: None,
            view_count: 0,
        }
    }

    #[tokio::test]
    async fn test_role_follows_classification() {
        let chat = Arc::new(RecordingChat::default());
        let dispatcher = NotificationDispatcher::new(chat.clone(), "target", roles(), "brand");

        assert!(dispatcher.dispatch(&video(120), NotifyMode::Live).await);
        assert!(dispatcher.dispatch(&video(119), NotifyMode::Test).await);

        let sent = chat.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "target");
        assert!(sent[0].1.content.starts_with("<@&L> "));
        assert!(sent[1].1.content.starts_with("<@&S> "));
        assert!(sent[1].1.content.ends_with("🧪 **TEST MODE**"));
        assert!(sent[0].1.card.is_some());
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let chat = Arc::new(RecordingChat {
            fail: true,
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(chat, "target", roles(), "brand");

        assert!(!dispatcher.dispatch(&video(300), NotifyMode::Live).await);
    }
}
