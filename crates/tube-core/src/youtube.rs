//! YouTube Data API v3 client.
//!
//! Resolving the latest video of a channel takes three requests:
//! 1. `search` for the newest video id of the channel
//! 2. `videos` for its snippet, duration and statistics
//! 3. `channels` for the channel avatar (best effort)

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};
use tube_models::{ChannelId, VideoId, VideoSummary};

use crate::duration::parse_iso8601_duration;
use crate::source::{SourceError, VideoSource};

/// Public API endpoint.
pub const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Envelope shared by every list endpoint.
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    // The API encodes counters as strings
    view_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

impl Thumbnails {
    fn best(&self) -> Option<&str> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    snippet: ChannelSnippet,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    #[serde(default)]
    thumbnails: Thumbnails,
}

/// [`VideoSource`] backed by the YouTube Data API.
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Creates a client against the public API with a per-request timeout.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Request(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: YOUTUBE_API_URL.to_string(),
        })
    }

    /// Points the client at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, SourceError> {
        let url = format!("{}/{}", self.base_url, resource);
        trace!(resource, "YouTube API request");

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let list: ListResponse<T> = response.json().await?;
        Ok(list.items)
    }

    async fn channel_icon(&self, channel: &ChannelId) -> Option<String> {
        let result = self
            .list::<ChannelItem>("channels", &[("part", "snippet"), ("id", channel.as_str())])
            .await;

        match result {
            Ok(items) => items
                .into_iter()
                .next()
                .and_then(|c| c.snippet.thumbnails.default.map(|t| t.url)),
            Err(e) => {
                debug!(channel_id = %channel, error = %e, "Channel icon lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn latest_video(&self, channel: &ChannelId) -> Result<Option<VideoSummary>, SourceError> {
        let search: Vec<SearchItem> = self
            .list(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel.as_str()),
                    ("order", "date"),
                    ("maxResults", "1"),
                    ("type", "video"),
                ],
            )
            .await?;

        let Some(video_id) = search.into_iter().find_map(|item| item.id.video_id) else {
            return Ok(None);
        };

        let videos: Vec<VideoItem> = self
            .list(
                "videos",
                &[("part", "contentDetails,snippet,statistics"), ("id", video_id.as_str())],
            )
            .await?;

        let Some(video) = videos.into_iter().next() else {
            return Ok(None);
        };

        let channel_icon = self.channel_icon(channel).await;

        Ok(Some(summarize(video, channel, channel_icon)))
    }
}

/// Normalizes an API video into a [`VideoSummary`], filling defaults for
/// missing optional fields.
fn summarize(video: VideoItem, channel: &ChannelId, channel_icon: Option<String>) -> VideoSummary {
    let id = VideoId::from(video.id);
    let duration_seconds = video
        .content_details
        .map(|d| parse_iso8601_duration(&d.duration))
        .unwrap_or(0);
    let view_count = video
        .statistics
        .and_then(|s| s.view_count)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let thumbnail_url = video.snippet.thumbnails.best().unwrap_or_default().to_string();

    VideoSummary {
        url: VideoSummary::watch_url(&id),
        id,
        title: video.snippet.title,
        description: video.snippet.description,
        published_at: video.snippet.published_at,
        channel_id: channel.clone(),
        channel_title: video.snippet.channel_title,
        duration_seconds,
        thumbnail_url,
        channel_icon,
        view_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_full_item() {
        let item: VideoItem = serde_json::from_value(serde_json::json!({
            "id": "vid1",
            "snippet": {
                "title": "Hello",
                "description": "Line one\nLine two",
                "publishedAt": "2024-05-01T10:30:00Z",
                "channelTitle": "Chan",
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/d.jpg" },
                    "high": { "url": "https://i.ytimg.com/h.jpg" }
                }
            },
            "contentDetails": { "duration": "PT2M" },
            "statistics": { "viewCount": "1234" }
        }))
        .unwrap();

        let summary = summarize(item, &ChannelId::from("UC1"), Some("icon".to_string()));

        assert_eq!(summary.id, VideoId::from("vid1"));
        assert_eq!(summary.url, "https://www.youtube.com/watch?v=vid1");
        assert_eq!(summary.duration_seconds, 120);
        assert_eq!(summary.view_count, 1234);
        assert_eq!(summary.thumbnail_url, "https://i.ytimg.com/h.jpg");
        assert_eq!(summary.channel_icon.as_deref(), Some("icon"));
        assert_eq!(summary.channel_title, "Chan");
    }

    #[test]
    fn test_summarize_tolerates_missing_optionals() {
        let item: VideoItem = serde_json::from_value(serde_json::json!({
            "id": "vid2",
            "snippet": {
                "title": "Bare",
                "publishedAt": "2024-05-01T10:30:00Z"
            }
        }))
        .unwrap();

        let summary = summarize(item, &ChannelId::from("UC1"), None);

        assert_eq!(summary.duration_seconds, 0);
        assert_eq!(summary.view_count, 0);
        assert_eq!(summary.description, "");
        assert_eq!(summary.thumbnail_url, "");
        assert!(summary.channel_icon.is_none());
    }

    #[test]
    fn test_empty_list_response() {
        let list: ListResponse<SearchItem> = serde_json::from_str("{}").unwrap();
        assert!(list.items.is_empty());
    }
}
