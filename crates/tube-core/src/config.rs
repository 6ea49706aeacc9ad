//! Notifier configuration.
//!
//! Everything is read from the environment (optionally seeded from `.env`
//! files). Missing required values are fatal at startup and name the
//! variable that is missing.
//!
//! # Environment Variables
//!
//! Required:
//! - `DISCORD_TOKEN`, `DISCORD_CHANNEL_ID`
//! - `YOUTUBE_API_KEY`, `YOUTUBE_CHANNEL_1`, `YOUTUBE_CHANNEL_2`
//! - `ROLE_LONG_VIDEO`, `ROLE_SHORT_VIDEO`
//!
//! Optional:
//! - `DISCORD_COMMAND_CHANNEL_ID`: Channel watched for operator commands
//!   (default: `DISCORD_CHANNEL_ID`)
//! - `TUBE_STATE_DIR`: Base state directory (default: `~/.tube-notifier`)
//! - `TUBE_STATE_FILE`: Full path of the state file
//!   (default: `$TUBE_STATE_DIR/lastVideos.json`)
//! - `POLL_INTERVAL_MINUTES`: Poll interval (default: 30)
//! - `HTTP_TIMEOUT_SECS`: Per-request timeout (default: 15)
//! - `TEST_DISPATCH_DELAY_MS`: Delay between `!test123` channels (default: 2000)
//! - `FOOTER_BRAND`: Middle token of the card footer (default: `jes.is-a.dev`)

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tube_models::ChannelId;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "TUBE_STATE_DIR";

/// Environment variable for the full state file path.
pub const STATE_FILE_ENV: &str = "TUBE_STATE_FILE";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".tube-notifier";

/// State file name inside the state directory.
const STATE_FILE_NAME: &str = "lastVideos.json";

const DEFAULT_POLL_INTERVAL_MINUTES: u64 = 30;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_TEST_DISPATCH_DELAY_MS: u64 = 2000;
const DEFAULT_FOOTER_BRAND: &str = "jes.is-a.dev";

/// Errors raised while building the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing configuration: {field}")]
    Missing { field: &'static str },

    /// A variable is set but cannot be used.
    #[error("invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Role identifiers mentioned in notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleConfig {
    /// Role pinged for long videos.
    pub long_video: String,
    /// Role pinged for shorts.
    pub short_video: String,
}

/// Complete runtime configuration.
#[derive(Clone)]
pub struct NotifierConfig {
    pub discord_token: String,
    /// Chat channel receiving notifications.
    pub target_channel_id: String,
    /// Chat channel watched for operator commands.
    pub command_channel_id: String,
    pub youtube_api_key: String,
    /// Tracked video channels, in polling order.
    pub tracked_channels: Vec<ChannelId>,
    pub roles: RoleConfig,
    pub state_file: PathBuf,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
    pub test_dispatch_delay: Duration,
    pub footer_brand: String,
}

impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("discord_token", &"<redacted>")
            .field("target_channel_id", &self.target_channel_id)
            .field("command_channel_id", &self.command_channel_id)
            .field("youtube_api_key", &"<redacted>")
            .field("tracked_channels", &self.tracked_channels)
            .field("roles", &self.roles)
            .field("state_file", &self.state_file)
            .field("poll_interval", &self.poll_interval)
            .field("http_timeout", &self.http_timeout)
            .field("test_dispatch_delay", &self.test_dispatch_delay)
            .field("footer_brand", &self.footer_brand)
            .finish()
    }
}

impl NotifierConfig {
    /// Builds the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Required fields are checked in a fixed order so the first missing
    /// one is always reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |field: &'static str| get(field).ok_or(ConfigError::Missing { field });

        let discord_token = require("DISCORD_TOKEN")?;
        let target_channel_id = require("DISCORD_CHANNEL_ID")?;
        let youtube_api_key = require("YOUTUBE_API_KEY")?;
        let roles = RoleConfig {
            long_video: require("ROLE_LONG_VIDEO")?,
            short_video: require("ROLE_SHORT_VIDEO")?,
        };
        let tracked_channels = vec![
            ChannelId::from(require("YOUTUBE_CHANNEL_1")?),
            ChannelId::from(require("YOUTUBE_CHANNEL_2")?),
        ];

        let command_channel_id =
            get("DISCORD_COMMAND_CHANNEL_ID").unwrap_or_else(|| target_channel_id.clone());

        let state_file = get(STATE_FILE_ENV).map(PathBuf::from).unwrap_or_else(|| {
            get(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_state_dir)
                .join(STATE_FILE_NAME)
        });

        let poll_minutes = parse_number(&get, "POLL_INTERVAL_MINUTES", DEFAULT_POLL_INTERVAL_MINUTES)?;
        if poll_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "POLL_INTERVAL_MINUTES",
                reason: "must be at least 1".to_string(),
            });
        }
        let timeout_secs = parse_number(&get, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let delay_ms = parse_number(&get, "TEST_DISPATCH_DELAY_MS", DEFAULT_TEST_DISPATCH_DELAY_MS)?;

        Ok(Self {
            discord_token,
            target_channel_id,
            command_channel_id,
            youtube_api_key,
            tracked_channels,
            roles,
            state_file,
            poll_interval: Duration::from_secs(poll_minutes * 60),
            http_timeout: Duration::from_secs(timeout_secs),
            test_dispatch_delay: Duration::from_millis(delay_ms),
            footer_brand: get("FOOTER_BRAND").unwrap_or_else(|| DEFAULT_FOOTER_BRAND.to_string()),
        })
    }
}

fn parse_number<G>(get: &G, field: &'static str, default: u64) -> Result<u64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(field) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            field,
            reason: format!("expected a non-negative integer, got {:?}", raw),
        }),
    }
}

fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_STATE_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}

/// Get the notifier state directory.
///
/// The state directory is determined by:
/// 1. `TUBE_STATE_DIR` environment variable if set
/// 2. `~/.tube-notifier` if home directory is available
/// 3. `.tube-notifier` in current directory as fallback
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_state_dir())
}

/// Loads `.env` files into the process environment.
///
/// `$TUBE_STATE_DIR/.env` is read first, then `.env.local` or `.env` from
/// the working directory. Variables already set are never overridden.
pub fn load_dotenv() {
    let env_path = state_dir().join(".env");
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());
}
