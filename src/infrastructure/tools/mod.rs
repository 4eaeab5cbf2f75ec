//! # Tools Module
//!
//! Local actions the assistant can request (filesystem, shell, git), the
//! registry that resolves tool names to them, and the executor that runs them.

pub mod actions;
pub mod executor;
pub mod registry;

pub use executor::ToolExecutor;
pub use registry::ActionRegistry;
