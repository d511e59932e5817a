//! Parameters and rendering of the per-wiki edit count query.

use crate::error::{Result, WmcsError};
use regex::Regex;
use std::sync::LazyLock;

/// Month queried when nothing else is configured.
pub const DEFAULT_MONTH: &str = "2019-08";

/// Row limit applied when nothing else is configured.
pub const DEFAULT_LIMIT: u32 = 100;

/// Source table holding daily edit counts split by network origin.
pub const DEFAULT_TABLE: &str = "joal.test_geoeditors_daily_network_origin";

/// `network_origin` value attributed to Cloud VPS instances.
pub const DEFAULT_ORIGIN: &str = "wikimedia_labs";

/// Column results are grouped and ordered by.
const GROUP_KEY: &str = "wiki_db";

/// Label of the grand total row appended by `with_total`.
pub const TOTAL_LABEL: &str = "TOTAL";

// ASCII digits only: `\d` would also accept other Unicode digits.
static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").expect("month pattern compiles")
});

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("table pattern compiles")
});

/// Parameters of the edit count query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// Month partition, `YYYY-MM`.
    pub month: String,

    /// Maximum number of rows returned.
    pub limit: u32,

    /// Fully qualified source table.
    pub table: String,

    /// Origin counted as WMCS edits.
    pub origin: String,

    /// Append a grand total row computed by the engine.
    pub with_total: bool,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            month: DEFAULT_MONTH.to_string(),
            limit: DEFAULT_LIMIT,
            table: DEFAULT_TABLE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            with_total: false,
        }
    }
}

impl QueryParams {
    /// Checks that every parameter can be spliced into the query safely.
    pub fn validate(&self) -> Result<()> {
        if !MONTH_RE.is_match(&self.month) {
            return Err(WmcsError::query(format!(
                "Invalid month '{}'. Expected YYYY-MM (e.g., {DEFAULT_MONTH})",
                self.month
            )));
        }

        if self.limit == 0 {
            return Err(WmcsError::query("Limit must be greater than zero"));
        }

        if !TABLE_RE.is_match(&self.table) {
            return Err(WmcsError::query(format!(
                "Invalid table name '{}'. Expected [database.]table",
                self.table
            )));
        }

        if self.origin.is_empty() {
            return Err(WmcsError::query("Network origin must not be empty"));
        }

        Ok(())
    }

    /// Validates the parameters and renders the HiveQL text.
    ///
    /// With `with_total`, the per-wiki rows are followed by one `TOTAL` row
    /// summed over every wiki of the month, not just the limited rows.
    pub fn to_sql(&self) -> Result<String> {
        self.validate()?;

        let origin = quote_literal(&self.origin);
        let month = quote_literal(&self.month);

        if !self.with_total {
            return Ok(format!(
                "SELECT\n  \
                 {GROUP_KEY},\n  \
                 SUM(IF(network_origin = {origin}, edit_count, 0)) AS wmcs_edits,\n  \
                 SUM(edit_count) AS total_edits\n\
                 FROM {table}\n\
                 WHERE month = {month}\n\
                 GROUP BY {GROUP_KEY}\n\
                 ORDER BY {GROUP_KEY}\n\
                 LIMIT {limit};",
                table = self.table,
                limit = self.limit,
            ));
        }

        // The engine sorts the total last through `is_total`; the outer
        // LIMIT keeps strict mode happy and never cuts a row.
        Ok(format!(
            "SELECT {GROUP_KEY}, wmcs_edits, total_edits\n\
             FROM (\n  \
             SELECT {GROUP_KEY}, wmcs_edits, total_edits, 0 AS is_total\n  \
             FROM (\n    \
             SELECT\n      \
             {GROUP_KEY},\n      \
             SUM(IF(network_origin = {origin}, edit_count, 0)) AS wmcs_edits,\n      \
             SUM(edit_count) AS total_edits\n    \
             FROM {table}\n    \
             WHERE month = {month}\n    \
             GROUP BY {GROUP_KEY}\n    \
             ORDER BY {GROUP_KEY}\n    \
             LIMIT {limit}\n  \
             ) per_wiki\n  \
             UNION ALL\n  \
             SELECT\n    \
             '{TOTAL_LABEL}' AS {GROUP_KEY},\n    \
             SUM(IF(network_origin = {origin}, edit_count, 0)) AS wmcs_edits,\n    \
             SUM(edit_count) AS total_edits,\n    \
             1 AS is_total\n  \
             FROM {table}\n  \
             WHERE month = {month}\n\
             ) with_total\n\
             ORDER BY is_total, {GROUP_KEY}\n\
             LIMIT {outer_limit};",
            table = self.table,
            limit = self.limit,
            outer_limit = u64::from(self.limit) + 1,
        ))
    }
}

/// Quotes a string literal, doubling embedded single quotes.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
