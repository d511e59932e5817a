//! Error types for wmcs-edits.
//!
//! Failures of the query engine itself are not errors here: they surface as
//! the engine's exit code. These variants cover everything that goes wrong
//! on our side of the pipe.

use thiserror::Error;

/// Main error type for wmcs-edits operations.
#[derive(Error, Debug)]
pub enum WmcsError {
    /// Configuration errors (unreadable or malformed config file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid query parameters (bad month, zero limit, bad table name).
    #[error("Query error: {0}")]
    Query(String),

    /// The engine process could not be started or waited on.
    #[error("Engine error: {message}")]
    Engine {
        message: String,
        /// True when the engine program does not exist.
        not_found: bool,
    },

    /// I/O errors while relaying output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WmcsError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an engine error from a failed spawn of `program`.
    pub fn spawn(program: &str, err: &std::io::Error) -> Self {
        Self::Engine {
            message: format!("failed to start '{program}': {err}"),
            not_found: err.kind() == std::io::ErrorKind::NotFound,
        }
    }

    /// Creates an engine error with the given message.
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
            not_found: false,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Query(_) => "Query Error",
            Self::Engine { .. } => "Engine Error",
            Self::Io(_) => "I/O Error",
        }
    }

    /// Returns true if our reader went away (`wmcs-edits | head`).
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }

    /// Process exit code to use when this error ends the run.
    ///
    /// A missing engine program follows the shell's "command not found";
    /// a closed reader follows a process killed by SIGPIPE.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Engine {
                not_found: true, ..
            } => 127,
            _ if self.is_broken_pipe() => 128 + 13,
            _ => 1,
        }
    }
}

/// Result type alias using WmcsError.
pub type Result<T> = std::result::Result<T, WmcsError>;
