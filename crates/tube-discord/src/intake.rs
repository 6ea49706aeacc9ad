//! Operator command intake.
//!
//! Discord has no push channel over plain REST, so the command channel is
//! polled. Messages that existed before the bot started are skipped: the
//! first successful request only records the newest message id.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tube_runtime::CommandHandler;

use crate::client::{snowflake, DiscordClient};

/// How often the command channel is checked.
pub const COMMAND_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Feeds new channel messages to the command handler, oldest first.
pub struct CommandIntake {
    client: Arc<DiscordClient>,
    handler: Arc<CommandHandler>,
    channel_id: String,
    /// Newest message already seen; `None` with `primed` means the channel was empty.
    last_seen: Option<String>,
    primed: bool,
}

impl CommandIntake {
    pub fn new(client: Arc<DiscordClient>, handler: Arc<CommandHandler>, channel_id: impl Into<String>) -> Self {
        Self {
            client,
            handler,
            channel_id: channel_id.into(),
            last_seen: None,
            primed: false,
        }
    }

    /// Polls the command channel until shutdown.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(COMMAND_POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(channel_id = %self.channel_id, "Listening for operator commands");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("command intake received shutdown signal");
                        break;
                    }
                }
            }
        }
    }

    /// Runs one intake step. Returns the number of commands executed.
    pub async fn poll_once(&mut self) -> usize {
        if !self.primed {
            match self.client.latest_message_id(&self.channel_id).await {
                Ok(latest) => {
                    debug!(channel_id = %self.channel_id, latest = ?latest, "Command intake primed");
                    self.last_seen = latest;
                    self.primed = true;
                }
                Err(e) => warn!(channel_id = %self.channel_id, error = %e, "Failed to prime command intake"),
            }
            return 0;
        }

        // An empty channel at startup pages forward from the first message
        let after = self.last_seen.as_deref().unwrap_or("0");
        let messages = match self.client.messages_after(&self.channel_id, Some(after)).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(channel_id = %self.channel_id, error = %e, "Failed to read command channel");
                return 0;
            }
        };

        let mut executed = 0;
        for message in messages {
            let is_newer = self
                .last_seen
                .as_deref()
                .map_or(true, |seen| snowflake(&message.id) > snowflake(seen));
            if !is_newer {
                continue;
            }
            self.last_seen = Some(message.id.clone());

            if self.handler.handle(&message).await.is_some() {
                executed += 1;
            }
        }
        executed
    }
}
