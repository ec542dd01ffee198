//! Interactive prompts on the controlling terminal.

use dialoguer::Input;
use tracing::debug;

use super::{FileHistory, Prompter};
use crate::config::{ConfigError, Field};

/// Reads field values from the terminal with `dialoguer`.
///
/// Blank answers are rejected and asked again; surrounding whitespace is
/// stripped from accepted answers.
#[derive(Debug, Default)]
pub struct TerminalPrompter {
    history: Option<FileHistory>,
}

impl TerminalPrompter {
    /// Creates a prompter without history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a prompter that records answers in `history`.
    #[must_use]
    pub fn with_history(history: FileHistory) -> Self {
        Self {
            history: Some(history),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, field: Field) -> Result<String, ConfigError> {
        if let Some(hint) = field.hint() {
            println!("\n{hint}");
        }

        let input = Input::<String>::new()
            .with_prompt(field.label())
            .validate_with(move |text: &String| validate_answer(field, text));

        let input = match self.history.as_mut() {
            Some(history) => input.history_with(history),
            None => input,
        };

        let text = input.interact_text().map_err(|e| ConfigError::Prompt {
            field,
            source: match e {
                dialoguer::Error::IO(err) => err,
            },
        })?;

        debug!("Read {} from terminal", field);
        Ok(normalize_answer(&text))
    }
}

/// Rejects answers that are empty or only whitespace.
fn validate_answer(field: Field, text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        Err(format!("{field} cannot be empty"))
    } else {
        Ok(())
    }
}

/// Strips surrounding whitespace from an accepted answer.
fn normalize_answer(text: &str) -> String {
    text.trim().to_owned()
}
