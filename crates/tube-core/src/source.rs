//! The video platform boundary.

use async_trait::async_trait;
use thiserror::Error;
use tube_models::{ChannelId, VideoSummary};

/// Errors raised while fetching from the video platform.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The API answered with a body we could not understand.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs carry credentials such as the API key
        let e = e.without_url();
        if e.is_decode() {
            SourceError::Parse(e.to_string())
        } else {
            SourceError::Request(e.to_string())
        }
    }
}

/// Fetches the most recent public video of a channel.
///
/// `Ok(None)` means the platform has no video to report for the channel;
/// callers treat it like a transient failure and retry next cycle.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn latest_video(&self, channel: &ChannelId) -> Result<Option<VideoSummary>, SourceError>;
}
