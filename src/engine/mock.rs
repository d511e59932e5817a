//! Mock query engine for testing.
//!
//! Replays canned stdout and an exit code instead of spawning a process.

use super::{EngineOutcome, QueryEngine, Sink};
use crate::error::Result;
use crate::filter::{relay, LineFilter};
use async_trait::async_trait;
use std::sync::Mutex;

/// A mock engine that returns predefined output.
#[derive(Debug, Default)]
pub struct MockEngine {
    stdout: Vec<u8>,
    exit_code: i32,
    received: Mutex<Vec<String>>,
}

impl MockEngine {
    /// Creates a mock engine printing `stdout` and exiting with code 0.
    pub fn new(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    /// Sets the exit code reported after the output is replayed.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    /// Returns the queries this engine has been asked to run.
    pub fn received(&self) -> Vec<String> {
        self.received
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueryEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, sql: &str, filter: &LineFilter, sink: Sink<'_>) -> Result<EngineOutcome> {
        if let Ok(mut received) = self.received.lock() {
            received.push(sql.to_string());
        }

        let stats = relay(self.stdout.as_slice(), sink, filter).await?;

        Ok(EngineOutcome {
            exit_code: self.exit_code,
            stats,
        })
    }
}
