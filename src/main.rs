//! TeleConf - Main Entry Point
//!
//! Collects missing Telegram credentials on the terminal and stores them
//! in a JSON configuration file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use teleconf::config::{Config, ConfigOptions, Field};

/// Interactive configuration for Telegram bots.
#[derive(Parser, Debug)]
#[command(name = "teleconf")]
#[command(about = "Collect and store Telegram bot credentials")]
#[command(version)]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Request the Telegram API ID.
    #[arg(long)]
    api_id: bool,

    /// Request the Telegram API hash.
    #[arg(long)]
    api_hash: bool,

    /// Request the phone number.
    #[arg(long)]
    phone_number: bool,

    /// Do not request the bot token.
    #[arg(long)]
    no_bot_token: bool,

    /// Prompt again for requested fields that are already stored.
    #[arg(short, long)]
    force_update: bool,

    /// Print secrets in full instead of masking them.
    #[arg(long)]
    show: bool,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn options(&self) -> ConfigOptions {
        ConfigOptions::new()
            .with_config_file(&self.config)
            .with_request(Field::BotToken, !self.no_bot_token)
            .with_request(Field::ApiId, self.api_id)
            .with_request(Field::ApiHash, self.api_hash)
            .with_request(Field::PhoneNumber, self.phone_number)
            .with_force_update(self.force_update)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    debug!("Using configuration file {}", args.config.display());

    let config = match Config::load(&args.options()) {
        Ok(config) => config,
        Err(e) if e.is_cancelled() => {
            println!("\n\nInput canceled by user");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    println!("\n✓ Configuration stored in: {}", config.config_file().display());
    for field in Field::ALL {
        if let Some(value) = config.get(field) {
            let shown = if field.is_secret() && !args.show {
                mask(value)
            } else {
                value.to_owned()
            };
            println!("  {field}: {shown}");
        }
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Masks a secret for display, keeping its first few characters.
fn mask(s: &str) -> String {
    const VISIBLE: usize = 4;

    let count = s.chars().count();
    if count <= VISIBLE * 2 {
        "*".repeat(count)
    } else {
        format!("{}{}", s.chars().take(VISIBLE).collect::<String>(), "*".repeat(8))
    }
}
