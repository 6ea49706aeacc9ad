//! Discord front end for the YouTube notifier.
//!
//! Talks to Discord over its REST API:
//! - notifications and command replies are posted as channel messages
//! - operator commands are picked up by polling the command channel
//!
//! # Example
//!
//! ```ignore
//! use tube_core::NotifierConfig;
//! use tube_discord::DiscordBot;
//!
//! let config = NotifierConfig::from_env()?;
//! let bot = DiscordBot::new(&config)?;
//! bot.get_me().await?;
//! bot.run().await?;
//! ```

pub mod bot;
pub mod client;
pub mod error;
pub mod intake;

pub use bot::DiscordBot;
pub use client::{DiscordClient, DISCORD_API_URL};
pub use error::{DiscordError, Result};
pub use intake::{CommandIntake, COMMAND_POLL_INTERVAL};
