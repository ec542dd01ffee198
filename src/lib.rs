//! TeleConf Library
//!
//! Interactive collection and persistence of the credentials a Telegram bot
//! or userbot needs at startup.
//!
//! This crate provides:
//! - Loading stored credentials from a JSON file
//! - Prompting on the terminal for requested fields that are missing
//! - Writing confirmed values back to the file
//!
//! ```no_run
//! use teleconf::config::{Config, ConfigOptions, Field};
//!
//! # fn main() -> Result<(), teleconf::config::ConfigError> {
//! // API ID and hash are required to start an MTProto session
//! let options = ConfigOptions::new()
//!     .with_request(Field::ApiId, true)
//!     .with_request(Field::ApiHash, true);
//! let config = Config::load(&options)?;
//!
//! let api_id = config.api_id_number()?;
//! let api_hash = config.api_hash().unwrap_or_default();
//! # let _ = (api_id, api_hash);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod prompt;
