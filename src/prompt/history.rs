//! Prompt history persisted next to the configuration file.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use dialoguer::History;
use tracing::{debug, warn};

/// Maximum number of remembered entries.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// Line-based history file used for arrow-key recall in prompts.
///
/// Failures to read or write the file are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct FileHistory {
    path: PathBuf,
    entries: VecDeque<String>,
    max_entries: usize,
}

impl FileHistory {
    /// Opens a history file, starting empty if it cannot be read.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_owned)
                .collect(),
            Err(e) => {
                debug!("No prompt history at {}: {}", path.display(), e);
                VecDeque::new()
            }
        };

        let mut history = Self {
            path,
            entries,
            max_entries: MAX_HISTORY_ENTRIES,
        };
        history.truncate();
        history
    }

    /// Opens the history belonging to a configuration file.
    ///
    /// `dir/config.json` keeps its history in `dir/.config.json.history`.
    #[must_use]
    pub fn for_config_file(config_file: &Path) -> Option<Self> {
        Self::path_for(config_file).map(Self::open)
    }

    /// Returns the history path for a configuration file.
    #[must_use]
    pub fn path_for(config_file: &Path) -> Option<PathBuf> {
        let name = config_file.file_name()?.to_string_lossy();
        Some(config_file.with_file_name(format!(".{name}.history")))
    }

    /// Sets how many entries are kept.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self.truncate();
        self
    }

    /// Path of the history file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn push(&mut self, line: String) {
        self.entries.retain(|e| *e != line);
        self.entries.push_back(line);
        self.truncate();
    }

    fn truncate(&mut self) {
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Failed to create {}: {}", parent.display(), e);
                return;
            }
        }

        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(entry);
            content.push('\n');
        }

        if let Err(e) = std::fs::write(&self.path, content) {
            warn!("Failed to save prompt history to {}: {}", self.path.display(), e);
        }
    }
}

impl<T: ToString> History<T> for FileHistory {
    fn read(&self, pos: usize) -> Option<String> {
        // Position 0 is the most recent entry.
        self.entries.iter().rev().nth(pos).cloned()
    }

    fn write(&mut self, val: &T) {
        let line = val.to_string();
        let line = line.trim();
        if line.is_empty() || line.contains('\n') {
            return;
        }
        self.push(line.to_owned());
        self.persist();
    }
}
