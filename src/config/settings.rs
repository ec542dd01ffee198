//! Loader options and the resolved credential configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{ConfigRecord, Field};
use crate::prompt::{FileHistory, Prompter, TerminalPrompter};

/// Default path of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Which fields to collect and where to keep them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOptions {
    /// Path to the JSON file storing configuration values.
    pub config_file: PathBuf,

    /// Collect the bot token.
    pub request_bot_token: bool,

    /// Collect the API ID.
    pub request_api_id: bool,

    /// Collect the API hash.
    pub request_api_hash: bool,

    /// Collect the phone number.
    pub request_phone_number: bool,

    /// Re-prompt for requested fields even if they are already stored.
    pub force_update: bool,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            request_bot_token: true,
            request_api_id: false,
            request_api_hash: false,
            request_phone_number: false,
            force_update: false,
        }
    }
}

impl ConfigOptions {
    /// Creates options with the defaults (only the bot token is requested).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = path.into();
        self
    }

    /// Sets the request flag of a field.
    #[must_use]
    pub fn with_request(mut self, field: Field, requested: bool) -> Self {
        *self.request_flag_mut(field) = requested;
        self
    }

    /// Sets whether stored values are re-prompted.
    #[must_use]
    pub fn with_force_update(mut self, force_update: bool) -> Self {
        self.force_update = force_update;
        self
    }

    /// Checks whether a field is requested.
    #[must_use]
    pub fn is_requested(&self, field: Field) -> bool {
        match field {
            Field::ApiId => self.request_api_id,
            Field::ApiHash => self.request_api_hash,
            Field::BotToken => self.request_bot_token,
            Field::PhoneNumber => self.request_phone_number,
        }
    }

    /// Requested fields in prompting order.
    pub fn requested(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|&field| self.is_requested(field))
    }

    fn request_flag_mut(&mut self, field: Field) -> &mut bool {
        match field {
            Field::ApiId => &mut self.request_api_id,
            Field::ApiHash => &mut self.request_api_hash,
            Field::BotToken => &mut self.request_bot_token,
            Field::PhoneNumber => &mut self.request_phone_number,
        }
    }
}

/// Credentials resolved from the configuration file and user input.
///
/// Only requested fields are populated, even when the file holds others.
#[derive(Debug, Clone)]
pub struct Config {
    config_file: PathBuf,
    record: ConfigRecord,
    values: HashMap<Field, String>,
}

impl Config {
    /// Loads the configuration, asking on the terminal for anything missing.
    ///
    /// Entered values are kept in a prompt history next to the config file.
    pub fn load(options: &ConfigOptions) -> Result<Self, ConfigError> {
        let mut prompter = match FileHistory::for_config_file(&options.config_file) {
            Some(history) => TerminalPrompter::with_history(history),
            None => TerminalPrompter::new(),
        };
        Self::load_with(options, &mut prompter)
    }

    /// Loads the configuration, asking `prompter` for anything missing.
    ///
    /// The file is rewritten only when a value changed.
    pub fn load_with<P>(options: &ConfigOptions, prompter: &mut P) -> Result<Self, ConfigError>
    where
        P: Prompter + ?Sized,
    {
        let config_file =
            std::path::absolute(&options.config_file).map_err(|source| ConfigError::Io {
                path: options.config_file.clone(),
                source,
            })?;

        let mut record = ConfigRecord::load(&config_file)?;
        let mut values = HashMap::new();
        let mut changed = false;

        for field in options.requested() {
            let value = match record.get(field) {
                Some(existing) if !options.force_update && !existing.trim().is_empty() => {
                    debug!("Using stored {}", field);
                    existing
                }
                _ => {
                    debug!("Prompting for {}", field);
                    prompter.prompt(field)?
                }
            };

            changed |= record.set(field, &value);
            values.insert(field, value);
        }

        if changed {
            record.save(&config_file)?;
            info!("Saved configuration to {}", config_file.display());
        } else {
            debug!("Configuration in {} is up to date", config_file.display());
        }

        Ok(Self {
            config_file,
            record,
            values,
        })
    }

    /// Returns the value of a requested field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Bot token, if requested.
    #[must_use]
    pub fn bot_token(&self) -> Option<&str> {
        self.get(Field::BotToken)
    }

    /// API ID as text, if requested.
    #[must_use]
    pub fn api_id(&self) -> Option<&str> {
        self.get(Field::ApiId)
    }

    /// API hash, if requested.
    #[must_use]
    pub fn api_hash(&self) -> Option<&str> {
        self.get(Field::ApiHash)
    }

    /// Phone number, if requested.
    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.get(Field::PhoneNumber)
    }

    /// Parses the API ID into the integer type MTProto clients expect.
    pub fn api_id_number(&self) -> Result<i32, ConfigError> {
        let text = self
            .api_id()
            .ok_or(ConfigError::NotRequested(Field::ApiId))?;
        text.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidApiId(text.to_owned()))
    }

    /// Absolute path of the configuration file.
    #[must_use]
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Full record as written to disk.
    #[must_use]
    pub fn record(&self) -> &ConfigRecord {
        &self.record
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to read input for {field}: {source}")]
    Prompt {
        field: Field,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid API ID format (must be an integer): {0:?}")]
    InvalidApiId(String),

    #[error("Field {0} was not requested")]
    NotRequested(Field),

    #[error("Unknown configuration field: {0}")]
    UnknownField(String),
}

impl ConfigError {
    /// Checks whether the user interrupted a prompt (Ctrl+C).
    ///
    /// Closed input or a missing terminal are failures, not cancellations.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Prompt { source, .. } if source.kind() == std::io::ErrorKind::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use serde_json::Value;

    use super::*;

    /// Answers prompts from a fixed script and records what was asked.
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: VecDeque<&'static str>,
        asked: Vec<Field>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn prompt(&mut self, field: Field) -> Result<String, ConfigError> {
            self.asked.push(field);
            self.answers
                .pop_front()
                .map(str::to_owned)
                .ok_or_else(|| ConfigError::Prompt {
                    field,
                    source: std::io::ErrorKind::UnexpectedEof.into(),
                })
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn setup(content: Option<&str>) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        if let Some(content) = content {
            std::fs::write(&path, content).unwrap();
        }
        (dir, path)
    }

    #[test]
    fn test_default_options() {
        let options = ConfigOptions::default();
        assert_eq!(options.config_file, PathBuf::from("config.json"));
        assert!(!options.force_update);
        assert_eq!(options.requested().collect::<Vec<_>>(), [Field::BotToken]);
    }

    #[test]
    fn test_requested_follows_prompt_order() {
        let options = ConfigOptions::new()
            .with_request(Field::PhoneNumber, true)
            .with_request(Field::ApiId, true)
            .with_request(Field::BotToken, false);
        assert_eq!(
            options.requested().collect::<Vec<_>>(),
            [Field::ApiId, Field::PhoneNumber]
        );
    }

    #[test]
    fn test_absent_file_prompts_and_saves() {
        let (_dir, path) = setup(None);
        let options = ConfigOptions::new().with_config_file(&path);
        let mut prompter = ScriptedPrompter::new(&["abc123"]);

        let config = Config::load_with(&options, &mut prompter).unwrap();

        assert_eq!(config.bot_token(), Some("abc123"));
        assert_eq!(prompter.asked, [Field::BotToken]);
        assert_eq!(read_json(&path), serde_json::json!({ "bot_token": "abc123" }));
    }

    #[test]
    fn test_stored_values_are_not_prompted() {
        let (_dir, path) = setup(Some(r#"{"bot_token": "abc123", "api_id": "555"}"#));
        let options = ConfigOptions::new()
            .with_config_file(&path)
            .with_request(Field::ApiId, true);
        let mut prompter = ScriptedPrompter::default();

        let config = Config::load_with(&options, &mut prompter).unwrap();

        assert!(prompter.asked.is_empty());
        assert_eq!(config.bot_token(), Some("abc123"));
        assert_eq!(config.api_id(), Some("555"));
        assert_eq!(config.api_id_number().unwrap(), 555);
    }

    #[test]
    fn test_force_update_reprompts_and_overwrites() {
        let (_dir, path) = setup(Some(r#"{"bot_token": "abc123", "api_id": "555"}"#));
        let options = ConfigOptions::new()
            .with_config_file(&path)
            .with_request(Field::ApiId, true)
            .with_force_update(true);
        let mut prompter = ScriptedPrompter::new(&["777", "xyz789"]);

        let config = Config::load_with(&options, &mut prompter).unwrap();

        assert_eq!(prompter.asked, [Field::ApiId, Field::BotToken]);
        assert_eq!(config.api_id(), Some("777"));
        assert_eq!(config.bot_token(), Some("xyz789"));
        assert_eq!(
            read_json(&path),
            serde_json::json!({ "bot_token": "xyz789", "api_id": "777" })
        );
    }

    #[test]
    fn test_empty_value_is_prompted() {
        let (_dir, path) = setup(Some(r#"{"bot_token": "", "api_hash": "  "}"#));
        let options = ConfigOptions::new()
            .with_config_file(&path)
            .with_request(Field::ApiHash, true);
        let mut prompter = ScriptedPrompter::new(&["hash", "token"]);

        let config = Config::load_with(&options, &mut prompter).unwrap();

        assert_eq!(prompter.asked, [Field::ApiHash, Field::BotToken]);
        assert_eq!(config.api_hash(), Some("hash"));
        assert_eq!(config.bot_token(), Some("token"));
    }

    #[test]
    fn test_unrequested_fields_are_never_prompted() {
        let (_dir, path) = setup(Some(r#"{"phone_number": "+15550100"}"#));
        let options = ConfigOptions::new()
            .with_config_file(&path)
            .with_request(Field::BotToken, false)
            .with_force_update(true);
        let mut prompter = ScriptedPrompter::default();

        let config = Config::load_with(&options, &mut prompter).unwrap();

        assert!(prompter.asked.is_empty());
        assert_eq!(config.phone_number(), None);
        assert_eq!(config.bot_token(), None);
        assert!(matches!(
            config.api_id_number(),
            Err(ConfigError::NotRequested(Field::ApiId))
        ));
    }

    #[test]
    fn test_round_trip_needs_no_prompts() {
        let (_dir, path) = setup(None);
        let options = ConfigOptions::new()
            .with_config_file(&path)
            .with_request(Field::ApiId, true)
            .with_request(Field::ApiHash, true)
            .with_request(Field::PhoneNumber, true);

        let mut first = ScriptedPrompter::new(&["12345", "0123abcd", "123:token", "+15550100"]);
        let written = Config::load_with(&options, &mut first).unwrap();

        let mut second = ScriptedPrompter::default();
        let reread = Config::load_with(&options, &mut second).unwrap();

        assert!(second.asked.is_empty());
        for field in Field::ALL {
            assert_eq!(written.get(field), reread.get(field));
        }
    }

    #[test]
    fn test_malformed_file_treated_as_empty() {
        let (_dir, path) = setup(Some("not json at all"));
        let options = ConfigOptions::new().with_config_file(&path);
        let mut prompter = ScriptedPrompter::new(&["abc123"]);

        let config = Config::load_with(&options, &mut prompter).unwrap();

        assert_eq!(config.bot_token(), Some("abc123"));
        assert_eq!(read_json(&path), serde_json::json!({ "bot_token": "abc123" }));
    }

    #[test]
    fn test_unchanged_file_is_not_rewritten() {
        let original = "{\"bot_token\":\"abc123\",\"extra\":1}";
        let (_dir, path) = setup(Some(original));
        let options = ConfigOptions::new().with_config_file(&path);

        Config::load_with(&options, &mut ScriptedPrompter::default()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_numeric_api_id_is_not_rewritten() {
        let original = r#"{"api_id": 12345, "bot_token": "abc123"}"#;
        let (_dir, path) = setup(Some(original));
        let options = ConfigOptions::new()
            .with_config_file(&path)
            .with_request(Field::ApiId, true);

        let config = Config::load_with(&options, &mut ScriptedPrompter::default()).unwrap();

        assert_eq!(config.api_id(), Some("12345"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_unrequested_stored_fields_survive_write() {
        let (_dir, path) = setup(Some(r#"{"api_hash": "keep-me", "session": "main"}"#));
        let options = ConfigOptions::new().with_config_file(&path);

        Config::load_with(&options, &mut ScriptedPrompter::new(&["abc123"])).unwrap();

        let saved = read_json(&path);
        assert_eq!(saved["api_hash"], "keep-me");
        assert_eq!(saved["session"], "main");
        assert_eq!(saved["bot_token"], "abc123");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets/bot/config.json");
        let options = ConfigOptions::new().with_config_file(&path);

        Config::load_with(&options, &mut ScriptedPrompter::new(&["abc123"])).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_content_is_not_validated() {
        let (_dir, path) = setup(None);
        let options = ConfigOptions::new()
            .with_config_file(&path)
            .with_request(Field::ApiId, true);

        let config =
            Config::load_with(&options, &mut ScriptedPrompter::new(&["not-a-number", "t"]))
                .unwrap();

        assert_eq!(config.api_id(), Some("not-a-number"));
        assert!(matches!(
            config.api_id_number(),
            Err(ConfigError::InvalidApiId(text)) if text == "not-a-number"
        ));
    }

    #[test]
    fn test_prompt_failure_propagates_without_writing() {
        let (_dir, path) = setup(None);
        let options = ConfigOptions::new().with_config_file(&path);

        let result = Config::load_with(&options, &mut ScriptedPrompter::default());

        assert!(matches!(
            result,
            Err(ConfigError::Prompt { field: Field::BotToken, .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_only_interrupted_prompt_is_cancel() {
        let prompt_error = |kind: std::io::ErrorKind| ConfigError::Prompt {
            field: Field::BotToken,
            source: kind.into(),
        };

        assert!(prompt_error(std::io::ErrorKind::Interrupted).is_cancelled());
        assert!(!prompt_error(std::io::ErrorKind::UnexpectedEof).is_cancelled());
        assert!(!prompt_error(std::io::ErrorKind::NotConnected).is_cancelled());
        assert!(!ConfigError::InvalidApiId("x".to_owned()).is_cancelled());
    }

    #[test]
    fn test_closed_input_is_not_cancel() {
        let (_dir, path) = setup(None);
        let options = ConfigOptions::new().with_config_file(&path);

        let err = Config::load_with(&options, &mut ScriptedPrompter::default()).unwrap_err();

        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let options = ConfigOptions::new().with_config_file(blocker.join("config.json"));

        let result = Config::load_with(&options, &mut ScriptedPrompter::new(&["abc123"]));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
