//! On-disk credential record.

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{ConfigError, Field};

/// Contents of the JSON configuration file.
///
/// Keys that are not known fields are kept untouched so that writing the
/// record back never drops data placed there by other tools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigRecord {
    values: Map<String, Value>,
}

impl ConfigRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a record from a JSON file.
    ///
    /// A missing file, invalid JSON, or a top-level value that is not an
    /// object all yield an empty record. Any other read failure is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Config file {} does not exist yet", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(values)) => Ok(Self { values }),
            Ok(_) => {
                warn!(
                    "Config file {} does not contain a JSON object, ignoring it",
                    path.display()
                );
                Ok(Self::new())
            }
            Err(e) => {
                warn!("Config file {} is not valid JSON ({}), ignoring it", path.display(), e);
                Ok(Self::new())
            }
        }
    }

    /// Writes the record to a JSON file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Wrote {} entries to {}", self.values.len(), path.display());
        Ok(())
    }

    /// Serializes the record as JSON indented with four spaces.
    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.values.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Returns the stored value of a field.
    ///
    /// Numbers are returned as their decimal text; any other non-string
    /// value counts as absent.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<String> {
        match self.values.get(field.key())? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Checks whether a field holds a non-blank value.
    #[must_use]
    pub fn has_value(&self, field: Field) -> bool {
        self.get(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Stores a field value, returning `true` if the record changed.
    pub fn set(&mut self, field: Field, value: &str) -> bool {
        if self.get(field).as_deref() == Some(value) {
            return false;
        }
        self.values
            .insert(field.key().to_owned(), Value::String(value.to_owned()));
        true
    }

    /// Returns the number of keys in the record, known fields or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks if the record has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
