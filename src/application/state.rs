//! # User State
//!
//! The persisted selection state (`config.json`): which assistant, thread and
//! run are selected, user labels for them, and a cache of threads we have
//! seen (the API offers no way to list threads).
//!
//! The whole document is rewritten after every mutation. Mutations go through
//! [`ConfigStore::update`], which saves even when the mutation fails.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::domain::types::Thread;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionIdentifiers {
    #[serde(default)]
    pub assistant_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub run_id: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Labels {
    #[serde(default)]
    pub assistant: HashMap<String, String>,
    #[serde(default)]
    pub thread: HashMap<String, String>,
    #[serde(default)]
    pub run: HashMap<String, String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cache {
    #[serde(default)]
    pub thread: HashMap<String, Thread>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserConfig {
    #[serde(default)]
    pub selected: SelectionIdentifiers,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub cache: Cache,
}

impl UserConfig {
    /// Selects a thread and remembers it in the cache.
    pub fn select_thread(&mut self, thread: &Thread) {
        self.selected.thread_id = Some(thread.id.clone());
        self.cache.thread.insert(thread.id.clone(), thread.clone());
    }

    /// Drops every trace of a thread, clearing the selection if it pointed at it.
    pub fn forget_thread(&mut self, thread_id: &str) {
        self.cache.thread.remove(thread_id);
        self.labels.thread.remove(thread_id);
        if self.selected.thread_id.as_deref() == Some(thread_id) {
            self.selected.thread_id = None;
            self.selected.run_id = None;
        }
    }

    pub fn forget_assistant(&mut self, assistant_id: &str) {
        self.labels.assistant.remove(assistant_id);
        if self.selected.assistant_id.as_deref() == Some(assistant_id) {
            self.selected.assistant_id = None;
        }
    }
}

/// Reads and writes [`UserConfig`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the state file, or the default state if it does not exist yet.
    pub fn load(&self) -> Result<UserConfig> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(UserConfig::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    /// Persists the whole document, creating the parent directory if needed.
    pub fn save(&self, config: &UserConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::debug!("Saved state to {}", self.path.display());
        Ok(())
    }

    /// Runs `mutate` on the config and then saves it, on success and failure alike.
    /// The mutation's error takes precedence over a save error.
    pub fn update<T>(
        &self,
        config: &mut UserConfig,
        mutate: impl FnOnce(&mut UserConfig) -> Result<T>,
    ) -> Result<T> {
        let result = mutate(config);
        let saved = self.save(config);
        let value = result?;
        saved?;
        Ok(value)
    }
}
