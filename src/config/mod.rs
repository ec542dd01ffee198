//! Credential configuration.
//!
//! Handles loading the JSON configuration file, deciding which fields
//! still need user input, and writing confirmed values back.

mod field;
mod record;
mod settings;

pub use field::{API_CREDENTIALS_URL, Field};
pub use record::ConfigRecord;
pub use settings::{Config, ConfigError, ConfigOptions, DEFAULT_CONFIG_FILE};
