//! User input for missing credentials.

mod history;
mod terminal;

pub use history::{FileHistory, MAX_HISTORY_ENTRIES};
pub use terminal::TerminalPrompter;

use crate::config::{ConfigError, Field};

/// Source of values for fields that are missing from the configuration.
pub trait Prompter {
    /// Asks for a single field and returns the entered line.
    fn prompt(&mut self, field: Field) -> Result<String, ConfigError>;
}
