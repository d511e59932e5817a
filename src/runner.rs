//! The query runner: renders the query, hands it to the engine and relays
//! the filtered result table.

use crate::engine::{QueryEngine, Sink};
use crate::error::Result;
use crate::filter::LineFilter;
use crate::query::QueryParams;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Runs the edit count query and returns the engine's exit code.
pub async fn run_query(
    engine: &dyn QueryEngine,
    params: &QueryParams,
    filter: &LineFilter,
    sink: Sink<'_>,
) -> Result<i32> {
    let sql = params.to_sql()?;
    info!(
        "Querying {} for {} via {}",
        params.table,
        params.month,
        engine.name()
    );
    debug!("Query text:\n{sql}");

    let outcome = engine.run(&sql, filter, sink).await?;
    debug!(
        "Relayed {} lines, suppressed {}",
        outcome.stats.forwarded, outcome.stats.suppressed
    );

    if !outcome.success() {
        warn!("{} exited with code {}", engine.name(), outcome.exit_code);
    }

    Ok(outcome.exit_code)
}

/// Writes the rendered query to `sink` without running it.
pub async fn print_query(params: &QueryParams, sink: Sink<'_>) -> Result<()> {
    let sql = params.to_sql()?;
    sink.write_all(sql.as_bytes()).await?;
    sink.write_all(b"\n").await?;
    sink.flush().await?;
    Ok(())
}
