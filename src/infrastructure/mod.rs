//! # Infrastructure Layer
//!
//! Handles interactions with external systems: the assistant HTTP API and the
//! local machine (processes and filesystem).

pub mod llm;
pub mod tools;
