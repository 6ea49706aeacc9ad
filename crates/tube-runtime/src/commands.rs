//! Operator commands.
//!
//! Three plain-text triggers are recognised on the command channel:
//! - `!test123` - send a test notification for every tracked channel
//! - `!reset` - forget every baseline so the next poll re-seeds them
//! - `!status` - compare stored baselines against the live latest videos
//!
//! `!test123` and `!status` never touch the state store's contents.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tube_core::format::NotifyMode;
use tube_core::{ChatClient, ChatError, InboundMessage, NotificationDispatcher, OutgoingMessage, VideoSource};
use tube_models::{ChannelId, ChannelStatus};

use crate::error::Result;
use crate::SharedStore;

/// A recognised operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    Test,
    Reset,
    Status,
}

impl OperatorCommand {
    /// Parses a whole message. Anything but an exact trigger is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "!test123" => Some(Self::Test),
            "!reset" => Some(Self::Reset),
            "!status" => Some(Self::Status),
            _ => None,
        }
    }

    /// The trigger text of this command.
    pub fn trigger(self) -> &'static str {
        match self {
            Self::Test => "!test123",
            Self::Reset => "!reset",
            Self::Status => "!status",
        }
    }
}

/// One row of the status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEntry {
    Available(ChannelStatus),
    /// The latest video could not be fetched.
    Unavailable(ChannelId),
}

/// Renders the `!status` reply.
pub fn render_status(entries: &[StatusEntry]) -> String {
    let mut out = String::from("📊 **Status Bot YouTube Notifier**\n\n");

    for entry in entries {
        match entry {
            StatusEntry::Available(status) => {
                out.push_str(&format!("🎬 **{}**\n", status.channel_title));
                out.push_str(&format!("Ultimo video: {}\n", status.latest_title));
                out.push_str(&format!(
                    "ID salvato: {}\n",
                    status.stored_id.as_ref().map_or("Nessuno", |id| id.as_str())
                ));
                out.push_str(&format!(
                    "Nuovo video?: {}\n\n",
                    if status.is_pending() { "✅ Sì" } else { "❌ No" }
                ));
            }
            StatusEntry::Unavailable(channel) => {
                out.push_str(&format!("❌ Errore nel recupero info per canale {}\n\n", channel));
            }
        }
    }

    out
}

/// Executes operator commands against the shared state.
pub struct CommandHandler {
    source: Arc<dyn VideoSource>,
    store: SharedStore,
    dispatcher: Arc<NotificationDispatcher>,
    chat: Arc<dyn ChatClient>,
    channels: Vec<ChannelId>,
    test_delay: Duration,
}

impl CommandHandler {
    pub fn new(
        source: Arc<dyn VideoSource>,
        store: SharedStore,
        dispatcher: Arc<NotificationDispatcher>,
        chat: Arc<dyn ChatClient>,
        channels: Vec<ChannelId>,
        test_delay: Duration,
    ) -> Self {
        Self {
            source,
            store,
            dispatcher,
            chat,
            channels,
            test_delay,
        }
    }

    /// Handles an inbound chat message.
    ///
    /// Returns the command that ran, or `None` when the message was not a
    /// command (or came from a bot).
    pub async fn handle(&self, message: &InboundMessage) -> Option<OperatorCommand> {
        if message.author_is_bot {
            return None;
        }
        let command = OperatorCommand::parse(&message.content)?;
        info!(command = command.trigger(), channel_id = %message.channel_id, "Operator command received");

        match command {
            OperatorCommand::Test => self.handle_test(message).await,
            OperatorCommand::Reset => self.handle_reset(message).await,
            OperatorCommand::Status => self.handle_status(message).await,
        }

        Some(command)
    }

    async fn handle_test(&self, message: &InboundMessage) {
        if let Err(e) = self.run_test(message).await {
            error!(error = %e, "Test command failed");
            self.reply(message, "❌ Errore durante l'esecuzione del test.").await;
        }
    }

    /// Sends a test-mode notification for every channel, bypassing the
    /// novelty check.
    async fn run_test(&self, message: &InboundMessage) -> std::result::Result<(), ChatError> {
        self.chat
            .send_message(
                &message.channel_id,
                OutgoingMessage::text("🧪 Esecuzione test in corso...").replying_to(&message.id),
            )
            .await?;

        for (i, channel) in self.channels.iter().enumerate() {
            if i > 0 && !self.test_delay.is_zero() {
                tokio::time::sleep(self.test_delay).await;
            }

            match self.source.latest_video(channel).await {
                Ok(Some(video)) => {
                    self.dispatcher.dispatch(&video, NotifyMode::Test).await;
                }
                Ok(None) | Err(_) => {
                    warn!(channel_id = %channel, "Test dispatch skipped, latest video unavailable");
                    self.chat
                        .send_message(
                            &message.channel_id,
                            OutgoingMessage::text(format!(
                                "❌ Impossibile recuperare l'ultimo video per il canale {}",
                                channel
                            )),
                        )
                        .await?;
                }
            }
        }

        self.chat
            .send_message(
                &message.channel_id,
                OutgoingMessage::text(
                    "✅ Test completato! Controlla i messaggi sopra per vedere il nuovo stile.",
                ),
            )
            .await
    }

    async fn handle_reset(&self, message: &InboundMessage) {
        match self.reset().await {
            Ok(()) => {
                info!("Video cache reset by operator");
                self.reply(
                    message,
                    "🔄 Cache dei video resettata! Il prossimo controllo rileverà i video attuali come nuovi.",
                )
                .await;
            }
            Err(e) => {
                error!(error = %e, "Reset command failed");
                self.reply(message, "❌ Errore durante il reset della cache.").await;
            }
        }
    }

    /// Clears every baseline and persists the empty state.
    pub async fn reset(&self) -> Result<()> {
        let mut store = self.store.lock().await;
        store.reset_all(&self.channels)?;
        Ok(())
    }

    async fn handle_status(&self, message: &InboundMessage) {
        let entries = self.status().await;
        self.reply(message, &render_status(&entries)).await;
    }

    /// Fetches every channel's latest video and compares it with the
    /// stored baseline. Read-only.
    pub async fn status(&self) -> Vec<StatusEntry> {
        let mut entries = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let latest = match self.source.latest_video(channel).await {
                Ok(Some(video)) => video,
                Ok(None) | Err(_) => {
                    entries.push(StatusEntry::Unavailable(channel.clone()));
                    continue;
                }
            };

            let stored_id = self.store.lock().await.get(channel).cloned();
            entries.push(StatusEntry::Available(ChannelStatus {
                channel_id: channel.clone(),
                channel_title: latest.channel_title,
                latest_title: latest.title,
                latest_id: latest.id,
                stored_id,
            }));
        }

        entries
    }

    async fn reply(&self, message: &InboundMessage, text: &str) {
        let reply = OutgoingMessage::text(text).replying_to(&message.id);
        if let Err(e) = self.chat.send_message(&message.channel_id, reply).await {
            warn!(channel_id = %message.channel_id, error = %e, "Failed to send command reply");
        }
    }
}
