//! # Command Handlers
//!
//! One module per command group. Handlers write their console output to the
//! supplied writer and persist state changes through [`CommandContext::store`].

pub mod assistant;
pub mod chat;
pub mod thread;

use anyhow::{Result, anyhow};
use std::sync::Arc;

use crate::application::state::{ConfigStore, UserConfig};
use crate::domain::config::AppConfig;
use crate::domain::traits::AssistantApi;
use crate::strings::messages;

/// Everything a handler needs.
pub struct CommandContext {
    pub api: Arc<dyn AssistantApi>,
    pub store: ConfigStore,
    pub config: UserConfig,
    pub settings: AppConfig,
}

impl CommandContext {
    pub fn new(api: Arc<dyn AssistantApi>, store: ConfigStore, settings: AppConfig) -> Result<Self> {
        let config = store.load()?;
        Ok(Self {
            api,
            store,
            config,
            settings,
        })
    }

    /// The selected assistant id, or an error telling the user to pick one.
    pub fn selected_assistant(&self) -> Result<String> {
        self.config
            .selected
            .assistant_id
            .clone()
            .ok_or_else(|| anyhow!(messages::NO_ASSISTANT_SELECTED))
    }

    pub fn update<T>(&mut self, mutate: impl FnOnce(&mut UserConfig) -> Result<T>) -> Result<T> {
        self.store.update(&mut self.config, mutate)
    }
}

/// Row marker for the selected entry.
pub(crate) fn marker(selected: bool) -> &'static str {
    if selected { "*" } else { " " }
}
