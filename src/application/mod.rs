//! # Application Layer
//!
//! Orchestrates the run loop and owns the persisted user state.

pub mod logging;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod test_utils;
