//! # Domain Layer
//!
//! Core definitions, types, and traits that describe the assistant protocol
//! and the local actions the client can perform.
//! Independent of the HTTP transport and the console front-end.

pub mod config;
pub mod error;
pub mod paths;
pub mod traits;
pub mod types;
