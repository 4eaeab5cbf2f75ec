//! Assistant API wrapper
//!
//! HTTP client for the hosted assistant service. The rest of the crate talks
//! to it through the [`AssistantApi`](crate::domain::traits::AssistantApi)
//! trait so tests can swap in a scripted implementation.

mod client;

pub use client::OpenAiClient;
