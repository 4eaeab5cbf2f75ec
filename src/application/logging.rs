//! # Progress Logging
//!
//! Event sinks used by the run loop. [`LogQueue`] buffers progress lines until
//! the front-end drains them; every line is also forwarded to `tracing` so
//! the session log keeps a full record.

use std::collections::VecDeque;

use crate::domain::traits::EventSink;

/// FIFO buffer of progress lines.
#[derive(Debug, Default)]
pub struct LogQueue {
    lines: VecDeque<String>,
}

impl LogQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every queued line, oldest first, and empties the queue.
    pub fn drain(&mut self) -> Vec<String> {
        self.lines.drain(..).collect()
    }
}

impl EventSink for LogQueue {
    fn log(&mut self, message: String) {
        tracing::info!("{}", message);
        self.lines.push_back(message);
    }
}
