//! Output filtering for engine stdout.
//!
//! The Hive client sometimes prints parquet reader diagnostics on stdout
//! in between result rows. Lines matching a deny list are dropped; every
//! other line is relayed byte-for-byte and in order.

use crate::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Substring marking the noisy parquet diagnostic lines.
pub const PARQUET_NOISE: &str = "parquet.hadoop";

/// Drops lines containing any of a set of substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFilter {
    patterns: Vec<String>,
}

impl Default for LineFilter {
    fn default() -> Self {
        Self::new([PARQUET_NOISE])
    }
}

impl LineFilter {
    /// Creates a filter from the given patterns. Empty patterns are ignored,
    /// since they would match every line.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filter = Self {
            patterns: Vec::new(),
        };
        for pattern in patterns {
            filter.push(pattern);
        }
        filter
    }

    /// Adds a pattern unless it is empty or already present.
    pub fn push(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !pattern.is_empty() && !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }

    /// Returns the active patterns.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if the line should be forwarded.
    pub fn retains(&self, line: &str) -> bool {
        self.retains_bytes(line.as_bytes())
    }

    /// Byte-level variant of [`retains`](Self::retains), for output that is
    /// not valid UTF-8.
    pub fn retains_bytes(&self, line: &[u8]) -> bool {
        !self
            .patterns
            .iter()
            .any(|p| contains_subslice(line, p.as_bytes()))
    }
}

fn contains_subslice(haystack: &[u8], needle: &[u8]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Counts of lines seen by [`relay`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Lines written to the sink.
    pub forwarded: usize,
    /// Lines dropped by the filter.
    pub suppressed: usize,
}

/// Copies `reader` to `writer` line by line, skipping lines the filter
/// rejects. Line terminators are kept as read; a trailing line without a
/// newline is written without one. The writer is flushed before returning.
pub async fn relay<R, W>(reader: R, writer: &mut W, filter: &LineFilter) -> Result<RelayStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut reader = reader;
    let mut stats = RelayStats::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        if filter.retains_bytes(&line) {
            writer.write_all(&line).await?;
            stats.forwarded += 1;
        } else {
            trace!("suppressed: {}", String::from_utf8_lossy(&line).trim_end());
            stats.suppressed += 1;
        }
    }

    writer.flush().await?;
    Ok(stats)
}
