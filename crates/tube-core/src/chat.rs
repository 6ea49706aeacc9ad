//! The chat platform boundary.
//!
//! The core never speaks a chat protocol directly. It hands
//! [`OutgoingMessage`]s to a [`ChatClient`] and receives operator commands
//! as [`InboundMessage`]s.

use async_trait::async_trait;
use thiserror::Error;
use tube_models::Card;

/// Errors raised by a chat client.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Transport failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The platform rejected the call.
    #[error("chat API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Credentials were refused.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The platform answered with a body we could not understand.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs carry credentials such as the API key
        let e = e.without_url();
        if e.is_decode() {
            ChatError::Parse(e.to_string())
        } else {
            ChatError::Request(e.to_string())
        }
    }
}

/// A message to post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutgoingMessage {
    pub content: String,
    pub card: Option<Card>,
    /// Message being replied to, if any.
    pub reply_to: Option<String>,
}

impl OutgoingMessage {
    /// Plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Text with a card attached.
    pub fn with_card(content: impl Into<String>, card: Card) -> Self {
        Self {
            content: content.into(),
            card: Some(card),
            reply_to: None,
        }
    }

    /// Marks the message as a reply to `message_id`.
    pub fn replying_to(mut self, message_id: impl Into<String>) -> Self {
        self.reply_to = Some(message_id.into());
        self
    }
}

/// A message received on a watched chat channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: String,
    pub channel_id: String,
    pub author_is_bot: bool,
    pub content: String,
}

/// Sends messages to the chat platform.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Posts a message to a chat channel.
    async fn send_message(&self, channel_id: &str, message: OutgoingMessage) -> Result<(), ChatError>;

    /// Renders the platform's mention token for a role.
    fn role_mention(&self, role_id: &str) -> String;
}
