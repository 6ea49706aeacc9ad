//! Wires configuration, clients and runtime into a running notifier.

use std::sync::Arc;

use tracing::{info, warn};
use tube_core::{ChatClient, NotificationDispatcher, NotifierConfig, VideoSource, YouTubeClient};
use tube_persistence::WatchStateStore;
use tube_runtime::{
    shared_store, CommandHandler, DetectionLoop, PollReport, Runtime, RuntimeConfig, SharedStore,
};

use crate::client::DiscordClient;
use crate::error::{DiscordError, Result};
use crate::intake::CommandIntake;

/// The Discord notifier bot.
pub struct DiscordBot {
    client: Arc<DiscordClient>,
    store: SharedStore,
    detector: Arc<DetectionLoop>,
    handler: Arc<CommandHandler>,
    command_channel_id: String,
    runtime_config: RuntimeConfig,
}

impl DiscordBot {
    /// Builds the bot from configuration.
    ///
    /// Loads persisted state and seeds an empty baseline for every tracked
    /// channel that has none yet.
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let client = Arc::new(DiscordClient::new(&config.discord_token, config.http_timeout)?);
        let youtube = YouTubeClient::new(&config.youtube_api_key, config.http_timeout)?;
        Ok(Self::with_clients(config, client, Arc::new(youtube)))
    }

    /// Builds the bot around existing clients.
    pub fn with_clients(
        config: &NotifierConfig,
        client: Arc<DiscordClient>,
        source: Arc<dyn VideoSource>,
    ) -> Self {
        let mut state = WatchStateStore::load(&config.state_file);
        let seeded = state.ensure_channels(&config.tracked_channels);
        info!(
            path = %config.state_file.display(),
            seeded,
            tracked = config.tracked_channels.len(),
            "State loaded"
        );
        let store = shared_store(state);

        let chat: Arc<dyn ChatClient> = client.clone();
        let dispatcher = Arc::new(NotificationDispatcher::from_config(Arc::clone(&chat), config));

        let runtime_config = RuntimeConfig::from_notifier(config);
        let detector = Arc::new(DetectionLoop::new(
            Arc::clone(&source),
            Arc::clone(&store),
            Arc::clone(&dispatcher),
            config.tracked_channels.clone(),
        ));
        let handler = Arc::new(CommandHandler::new(
            source,
            Arc::clone(&store),
            dispatcher,
            chat,
            config.tracked_channels.clone(),
            runtime_config.test_dispatch_delay,
        ));

        Self {
            client,
            store,
            detector,
            handler,
            command_channel_id: config.command_channel_id.clone(),
            runtime_config,
        }
    }

    /// Get the bot's username, validating the token.
    pub async fn get_me(&self) -> Result<String> {
        self.client
            .current_user()
            .await
            .map_err(|e| DiscordError::LoginFailed(e.to_string()))
    }

    /// The shared watch state.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Runs a single detection cycle and returns.
    pub async fn run_once(&self) -> PollReport {
        let report = self.detector.poll().await;
        info!(
            notified = report.notified(),
            skipped = report.skipped(),
            "Single cycle complete"
        );
        report
    }

    /// Runs the poller and command intake until SIGINT or SIGTERM.
    pub async fn run(&self) -> Result<()> {
        let mut runtime = Runtime::new(Arc::clone(&self.detector), self.runtime_config.clone());
        runtime.start()?;

        let mut intake = CommandIntake::new(
            Arc::clone(&self.client),
            Arc::clone(&self.handler),
            self.command_channel_id.clone(),
        );
        let shutdown = runtime.shutdown_signal();
        let intake_handle = tokio::spawn(async move {
            intake.run(shutdown).await;
        });

        info!("Bot is running");
        wait_for_signal().await?;
        info!("Shutdown requested");

        runtime.shutdown().await?;
        if let Err(e) = intake_handle.await {
            warn!(error = %e, "Command intake task ended abnormally");
        }

        info!("Bot stopped");
        Ok(())
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = terminate.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
