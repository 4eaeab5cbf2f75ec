//! # Action Registry
//!
//! Maps tool names to [`ActionKind`]s. Built once when a session starts and
//! read-only afterwards.

use std::collections::HashMap;

use crate::domain::error::{AssistError, Result};
use crate::domain::types::FunctionDefinition;
use crate::infrastructure::tools::actions::ActionKind;

#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    entries: HashMap<String, ActionKind>,
    // Registration order, so definitions are offered deterministically.
    order: Vec<String>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in action under its own name.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in ActionKind::ALL {
            registry.insert(kind.name().to_string(), kind);
        }
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, kind: ActionKind) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(AssistError::DuplicateAction(name));
        }
        self.insert(name, kind);
        Ok(())
    }

    fn insert(&mut self, name: String, kind: ActionKind) {
        self.order.push(name.clone());
        self.entries.insert(name, kind);
    }

    pub fn resolve(&self, name: &str) -> Result<ActionKind> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| AssistError::UnknownAction(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Function schemas for every registered name, in registration order.
    pub fn definitions(&self) -> Vec<FunctionDefinition> {
        self.order
            .iter()
            .map(|name| {
                let mut definition = self.entries[name].definition();
                definition.name = name.clone();
                definition
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_to_matching_kind() {
        let registry = ActionRegistry::with_defaults();
        assert_eq!(registry.names().count(), 4);
        for name in registry.names() {
            let kind = registry.resolve(name).unwrap();
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn test_defaults_follow_kind_order() {
        let registry = ActionRegistry::with_defaults();
        let expected: Vec<&str> = ActionKind::ALL.iter().map(|kind| kind.name()).collect();
        assert_eq!(registry.names().collect::<Vec<_>>(), expected);

        let mut extended = ActionRegistry::with_defaults();
        let err = extended.register("git_command", ActionKind::ShellExec).unwrap_err();
        assert!(matches!(err, AssistError::DuplicateAction(ref name) if name == "git_command"));
    }

    #[test]
    fn test_built_action_name_matches_registered_name() {
        let registry = ActionRegistry::with_defaults();
        let action = registry
            .resolve("read_file")
            .unwrap()
            .build(r#"{"path": "README.md"}"#)
            .unwrap();
        assert_eq!(action.name(), "read_file");
    }

    #[test]
    fn test_unknown_action() {
        let registry = ActionRegistry::with_defaults();
        let err = registry.resolve("launch_rockets").unwrap_err();
        assert!(matches!(err, AssistError::UnknownAction(ref name) if name == "launch_rockets"));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ActionRegistry::new();
        registry.register("exec_shell", ActionKind::ShellExec).unwrap();
        let err = registry.register("exec_shell", ActionKind::ReadFile).unwrap_err();
        assert!(matches!(err, AssistError::DuplicateAction(ref name) if name == "exec_shell"));
        // The first registration is kept.
        assert_eq!(registry.resolve("exec_shell").unwrap(), ActionKind::ShellExec);
    }

    #[test]
    fn test_definitions_follow_registration_order() {
        let registry = ActionRegistry::with_defaults();
        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["read_file", "write_file", "exec_shell", "git_command"]);
        assert!(registry.definitions()[0].parameters["required"].is_array());
    }
}
