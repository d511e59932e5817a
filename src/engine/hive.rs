//! Hive command-line client.

use super::{exit_code_of, EngineOutcome, QueryEngine, Sink};
use crate::error::{Result, WmcsError};
use crate::filter::{relay, LineFilter};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::BufReader;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default engine program, looked up on `PATH`.
pub const DEFAULT_PROGRAM: &str = "hive";

/// Default flag introducing the query text.
pub const DEFAULT_QUERY_FLAG: &str = "-e";

/// Runs queries through the `hive` CLI (or any client with the same shape).
///
/// Invoked as `<program> <args...> <query_flag> <sql>` with stdout piped
/// and stderr sent to the null device.
#[derive(Debug, Clone)]
pub struct HiveCli {
    program: String,
    query_flag: String,
    args: Vec<String>,
}

impl Default for HiveCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl HiveCli {
    /// Creates a client for the given program with the default query flag.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            query_flag: DEFAULT_QUERY_FLAG.to_string(),
            args: Vec::new(),
        }
    }

    /// Sets the flag that introduces the query text.
    pub fn with_query_flag(mut self, flag: impl Into<String>) -> Self {
        self.query_flag = flag.into();
        self
    }

    /// Sets extra arguments placed before the query flag.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the full argument vector passed for `sql`.
    pub fn command_args(&self, sql: &str) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(self.query_flag.clone());
        args.push(sql.to_string());
        args
    }
}

#[async_trait]
impl QueryEngine for HiveCli {
    fn name(&self) -> &str {
        &self.program
    }

    async fn run(&self, sql: &str, filter: &LineFilter, sink: Sink<'_>) -> Result<EngineOutcome> {
        debug!("Spawning {} with {} extra args", self.program, self.args.len());

        let mut child = Command::new(&self.program)
            .args(self.command_args(sql))
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| WmcsError::spawn(&self.program, &e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WmcsError::engine("engine stdout was not captured"))?;

        let relayed = relay(BufReader::new(stdout), sink, filter).await;

        if relayed.is_err() {
            // Nobody is reading anymore; don't leave the engine running.
            if let Err(e) = child.start_kill() {
                warn!("Failed to stop {}: {}", self.program, e);
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| WmcsError::engine(format!("failed to wait for '{}': {e}", self.program)))?;
        let stats = relayed?;

        Ok(EngineOutcome {
            exit_code: exit_code_of(status),
            stats,
        })
    }
}
