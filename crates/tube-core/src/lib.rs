//! Tube Core - shared building blocks of the YouTube notifier.
//!
//! - **config**: Environment-driven configuration and validation
//! - **duration**: ISO-8601 duration parsing
//! - **source**: The [`VideoSource`] boundary
//! - **youtube**: YouTube Data API v3 implementation of [`VideoSource`]
//! - **chat**: The [`ChatClient`] boundary to the chat platform
//! - **format**: Message templates and card rendering
//! - **dispatcher**: Sends rendered notifications, swallowing failures

pub mod chat;
pub mod config;
pub mod dispatcher;
pub mod duration;
pub mod format;
pub mod source;
pub mod youtube;

// Re-export commonly used items for convenience
pub use chat::{ChatClient, ChatError, InboundMessage, OutgoingMessage};
pub use config::{load_dotenv, state_dir, ConfigError, NotifierConfig, RoleConfig};
pub use dispatcher::NotificationDispatcher;
pub use duration::parse_iso8601_duration;
pub use format::{build_card, format_publish_date, render_text, short_description, template, NotifyMode};
pub use source::{SourceError, VideoSource};
pub use youtube::YouTubeClient;
