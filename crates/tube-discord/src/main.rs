//! YouTube notifier binary.
//!
//! Start the bot with:
//! ```bash
//! DISCORD_TOKEN=xxx YOUTUBE_API_KEY=xxx ... cargo run -p tube-discord
//! ```

use std::path::PathBuf;

use clap::Parser;
use tube_core::{load_dotenv, NotifierConfig};
use tube_discord::DiscordBot;
use tracing_subscriber::EnvFilter;

/// Posts a Discord notification whenever a tracked YouTube channel uploads.
#[derive(Parser, Debug)]
#[command(name = "tube-discord")]
#[command(about = "Discord notifier for new YouTube uploads")]
struct Args {
    /// Path of the watch state file (overrides TUBE_STATE_FILE)
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Run a single detection cycle and exit
    #[arg(long)]
    once: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    load_dotenv();

    let filter = match args.verbose {
        0 => "tube_discord=info,tube_runtime=info,tube_core=info,tube_persistence=info",
        1 => "tube_discord=debug,tube_runtime=debug,tube_core=debug,tube_persistence=debug",
        2 => "tube_discord=trace,tube_runtime=trace,tube_core=trace,tube_persistence=trace",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match NotifierConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(path) = args.state_file {
        config.state_file = path;
    }
    tracing::debug!(config = ?config, "Configuration loaded");

    let bot = DiscordBot::new(&config)?;

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Logged in");
            println!("\n[bell] YouTube notifier");
            println!("   Bot: {}", username);
            println!("   Channels: {}", config.tracked_channels.len());
            println!("   State: {}", config.state_file.display());
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to log in");
            return Err(e.into());
        }
    }

    if args.once {
        bot.run_once().await;
        return Ok(());
    }

    bot.run().await?;
    Ok(())
}
