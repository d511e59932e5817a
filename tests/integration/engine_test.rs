//! Engine and runner tests through the public library API.
//!
//! Uses `/bin/sh -c` as the engine so each test controls exactly what
//! lands on stdout and stderr.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::AsyncWrite;
use wmcs_edits::engine::{HiveCli, QueryEngine};
use wmcs_edits::filter::LineFilter;
use wmcs_edits::query::QueryParams;
use wmcs_edits::runner::run_query;

fn shell() -> HiveCli {
    HiveCli::new("/bin/sh").with_query_flag("-c")
}

/// Sink that takes one write and then reports its reader gone.
#[derive(Default)]
struct ClosingSink {
    written: Vec<u8>,
}

impl AsyncWrite for ClosingSink {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.written.is_empty() {
            self.written.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        } else {
            Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()))
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn test_stderr_never_reaches_sink() {
    let mut out = Vec::new();
    let outcome = shell()
        .run(
            "echo row; echo 'parquet.hadoop on stderr' >&2; echo 'ERROR: boom' >&2",
            &LineFilter::default(),
            &mut out,
        )
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(out, b"row\n");
}

#[tokio::test]
async fn test_signal_exit_maps_to_128_plus_signal() {
    let mut out = Vec::new();
    let outcome = shell()
        .run("echo before; kill -TERM $$", &LineFilter::default(), &mut out)
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 128 + 15);
    assert_eq!(out, b"before\n");
}

#[tokio::test]
async fn test_large_output_is_streamed_in_order() {
    let mut out = Vec::new();
    let script = "i=0; while [ $i -lt 5000 ]; do \
                  printf 'wiki%d\\t%d\\t%d\\n' $i $i $i; echo 'parquet.hadoop noise'; \
                  i=$((i+1)); done";
    let outcome = shell()
        .run(script, &LineFilter::default(), &mut out)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5000);
    assert_eq!(lines[0], "wiki0\t0\t0");
    assert_eq!(lines[4999], "wiki4999\t4999\t4999");
    assert_eq!(outcome.stats.suppressed, 5000);
}

#[tokio::test]
async fn test_runner_with_query_echoing_engine() {
    // Runs as `sh -c <script> engine <sql>`, so the query lands in $1.
    let engine = HiveCli::new("/bin/sh")
        .with_args(["-c", "printf '%s\\n' \"$1\" | head -n 1"])
        .with_query_flag("engine");
    let mut out = Vec::new();

    let code = run_query(
        &engine,
        &QueryParams::default(),
        &LineFilter::default(),
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(code, 0);
    assert_eq!(out, b"SELECT\n");
}

#[tokio::test]
async fn test_closed_sink_stops_endless_engine() {
    // Would never finish if the engine kept running after the sink closed.
    let mut sink = ClosingSink::default();
    let err = shell()
        .run(
            "while :; do printf 'enwiki\\t0\\n'; done",
            &LineFilter::default(),
            &mut sink,
        )
        .await
        .unwrap_err();

    assert!(err.is_broken_pipe());
    assert_eq!(err.exit_code(), 141);
    assert_eq!(sink.written, b"enwiki\t0\n");
}
