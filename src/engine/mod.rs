//! Query engine abstraction for wmcs-edits.
//!
//! The engine is an external command-line client that takes a query string
//! through a flag, prints results on stdout and diagnostics on stderr. A
//! trait sits in front of it so the runner can be tested without Hive.

mod hive;
mod mock;

pub use hive::{HiveCli, DEFAULT_PROGRAM, DEFAULT_QUERY_FLAG};
pub use mock::MockEngine;

use crate::error::Result;
use crate::filter::{LineFilter, RelayStats};
use async_trait::async_trait;
use std::process::ExitStatus;
use tokio::io::AsyncWrite;

/// Writer receiving the filtered engine output.
pub type Sink<'a> = &'a mut (dyn AsyncWrite + Unpin + Send);

/// How an engine invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOutcome {
    /// Exit code of the engine process.
    pub exit_code: i32,
    /// Lines forwarded and suppressed while relaying stdout.
    pub stats: RelayStats,
}

impl EngineOutcome {
    /// Returns true if the engine exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait defining the interface for query engines.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Runs `sql`, relaying stdout lines retained by `filter` into `sink`.
    ///
    /// A failing query is not an error: it is reported through
    /// [`EngineOutcome::exit_code`]. Errors are reserved for failures to
    /// start the engine or to write the sink.
    async fn run(&self, sql: &str, filter: &LineFilter, sink: Sink<'_>) -> Result<EngineOutcome>;
}

/// Converts a process exit status into a shell-style exit code.
///
/// Termination by signal maps to `128 + signal`.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
