//! # Strings Module
//!
//! Centralizes user-facing strings and progress log lines.

pub mod logs;
pub mod messages;
