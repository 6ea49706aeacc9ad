//! Discord REST client.
//!
//! Only the handful of endpoints the notifier needs are wrapped:
//! - `GET /users/@me` to validate the token
//! - `POST /channels/{id}/messages` to send notifications and replies
//! - `GET /channels/{id}/messages` to pick up operator commands

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use tube_core::{ChatClient, ChatError, InboundMessage, OutgoingMessage};
use tube_models::Card;

/// Public API root.
pub const DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Most messages Discord returns per history request.
const HISTORY_PAGE_SIZE: u8 = 50;

const USER_AGENT: &str = concat!("DiscordBot (https://github.com/tube-notifier, ", env!("CARGO_PKG_VERSION"), ")");

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embeds: Vec<Embed<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_reference: Option<MessageReference<'a>>,
    allowed_mentions: AllowedMentions,
}

/// Role mentions in notifications must ping; `@everyone` never does.
#[derive(Debug, Serialize)]
struct AllowedMentions {
    parse: &'static [&'static str],
    replied_user: bool,
}

const ALLOWED_MENTIONS: AllowedMentions = AllowedMentions {
    parse: &["roles", "users"],
    replied_user: false,
};

#[derive(Debug, Serialize)]
struct MessageReference<'a> {
    message_id: &'a str,
    fail_if_not_exists: bool,
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    url: &'a str,
    description: &'a str,
    color: u32,
    author: EmbedAuthor<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<EmbedImage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<EmbedImage<'a>>,
    footer: EmbedFooter<'a>,
}

#[derive(Debug, Serialize)]
struct EmbedAuthor<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct EmbedImage<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct EmbedFooter<'a> {
    text: &'a str,
}

impl<'a> From<&'a Card> for Embed<'a> {
    fn from(card: &'a Card) -> Self {
        Self {
            title: &card.title,
            url: &card.url,
            description: &card.description,
            color: card.color,
            author: EmbedAuthor {
                name: &card.author.name,
                icon_url: card.author.icon_url.as_deref(),
            },
            thumbnail: card.thumbnail_url.as_deref().map(|url| EmbedImage { url }),
            image: (!card.image_url.is_empty()).then(|| EmbedImage { url: &card.image_url }),
            footer: EmbedFooter { text: &card.footer },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    id: String,
    channel_id: String,
    #[serde(default)]
    content: String,
    author: ApiUser,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    #[serde(default)]
    username: String,
    #[serde(default)]
    bot: bool,
}

impl From<ApiMessage> for InboundMessage {
    fn from(msg: ApiMessage) -> Self {
        Self {
            id: msg.id,
            channel_id: msg.channel_id,
            author_is_bot: msg.author.bot,
            content: msg.content,
        }
    }
}

/// Parses a Discord snowflake for ordering; malformed ids sort first.
pub fn snowflake(id: &str) -> u64 {
    id.parse().unwrap_or(0)
}

/// Thin wrapper around the Discord REST API authenticated as a bot.
pub struct DiscordClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl DiscordClient {
    /// Creates a client with a per-request timeout.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ChatError::Request(e.to_string()))?;

        Ok(Self {
            http,
            token: token.into(),
            base_url: DISCORD_API_URL.to_string(),
        })
    }

    /// Points the client at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ChatError::Unauthorized(body));
        }
        Err(ChatError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Returns the bot's username, validating the token.
    pub async fn current_user(&self) -> Result<String, ChatError> {
        let response = self
            .http
            .get(self.url("/users/@me"))
            .header("Authorization", self.auth())
            .send()
            .await?;

        let user: ApiUser = Self::check(response).await?.json().await?;
        Ok(user.username)
    }

    /// Returns messages newer than `after`, oldest first.
    ///
    /// With `after`, pages are followed until the channel is drained.
    /// Without it, only the most recent page of the channel is returned.
    pub async fn messages_after(
        &self,
        channel_id: &str,
        after: Option<&str>,
    ) -> Result<Vec<InboundMessage>, ChatError> {
        let Some(after) = after else {
            let page = self.history_page(channel_id, None).await?;
            return Ok(page.into_iter().map(InboundMessage::from).collect());
        };

        let mut cursor = after.to_string();
        let mut messages = Vec::new();
        loop {
            let page = self.history_page(channel_id, Some(&cursor)).await?;
            let full = page.len() >= usize::from(HISTORY_PAGE_SIZE);
            let newest = page.last().map(|m| m.id.clone());
            messages.extend(page);

            match newest {
                Some(id) if full && snowflake(&id) > snowflake(&cursor) => cursor = id,
                _ => break,
            }
        }

        trace!(channel_id, count = messages.len(), "Fetched channel messages");
        Ok(messages.into_iter().map(InboundMessage::from).collect())
    }

    /// One history request, sorted oldest first.
    async fn history_page(&self, channel_id: &str, after: Option<&str>) -> Result<Vec<ApiMessage>, ChatError> {
        let mut request = self
            .http
            .get(self.url(&format!("/channels/{}/messages", channel_id)))
            .header("Authorization", self.auth())
            .query(&[("limit", HISTORY_PAGE_SIZE.to_string())]);
        if let Some(after) = after {
            request = request.query(&[("after", after)]);
        }

        let response = request.send().await?;
        let mut page: Vec<ApiMessage> = Self::check(response).await?.json().await?;
        page.sort_by_key(|m| snowflake(&m.id));
        Ok(page)
    }

    /// Id of the newest message in a channel, if any.
    pub async fn latest_message_id(&self, channel_id: &str) -> Result<Option<String>, ChatError> {
        let response = self
            .http
            .get(self.url(&format!("/channels/{}/messages", channel_id)))
            .header("Authorization", self.auth())
            .query(&[("limit", "1")])
            .send()
            .await?;

        let messages: Vec<ApiMessage> = Self::check(response).await?.json().await?;
        Ok(messages.into_iter().map(|m| m.id).max_by_key(|id| snowflake(id)))
    }
}

#[async_trait]
impl ChatClient for DiscordClient {
    async fn send_message(&self, channel_id: &str, message: OutgoingMessage) -> Result<(), ChatError> {
        let body = CreateMessage {
            content: &message.content,
            embeds: message.card.iter().map(Embed::from).collect(),
            message_reference: message.reply_to.as_deref().map(|id| MessageReference {
                message_id: id,
                fail_if_not_exists: false,
            }),
            allowed_mentions: ALLOWED_MENTIONS,
        };

        let response = self
            .http
            .post(self.url(&format!("/channels/{}/messages", channel_id)))
            .header("Authorization", self.auth())
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;

        debug!(channel_id, "Discord message sent");
        Ok(())
    }

    fn role_mention(&self, role_id: &str) -> String {
        format!("<@&{}>", role_id)
    }
}
