//! Configuration management for wmcs-edits.
//!
//! Handles loading configuration from a TOML file and environment variables.
//! Every value is optional: an empty configuration reproduces the original
//! fixed query (`hive -e`, month 2019-08, 100 rows).

use crate::engine::{HiveCli, DEFAULT_PROGRAM, DEFAULT_QUERY_FLAG};
use crate::error::{Result, WmcsError};
use crate::filter::{LineFilter, PARQUET_NOISE};
use crate::query::{QueryParams, DEFAULT_LIMIT, DEFAULT_MONTH, DEFAULT_ORIGIN, DEFAULT_TABLE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the engine program.
pub const ENV_ENGINE: &str = "WMCS_EDITS_HIVE";

/// Environment variable overriding the queried month.
pub const ENV_MONTH: &str = "WMCS_EDITS_MONTH";

/// Main configuration structure for wmcs-edits.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Query engine invocation.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Query parameters.
    #[serde(default)]
    pub query: QueryConfig,

    /// Output filtering.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Query engine configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Engine program (default: `hive`).
    pub program: Option<String>,

    /// Flag introducing the query text (default: `-e`).
    pub query_flag: Option<String>,

    /// Extra arguments placed before the query flag.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Query parameter configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    /// Month to query, `YYYY-MM`.
    pub month: Option<String>,

    /// Row limit.
    pub limit: Option<u32>,

    /// Source table.
    pub table: Option<String>,

    /// Network origin counted as WMCS.
    pub origin: Option<String>,

    /// Append a grand total row.
    pub with_total: Option<bool>,
}

/// Output filter configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Replaces the default deny list (`parquet.hadoop`) when set.
    pub suppress: Option<Vec<String>>,

    /// Patterns added on top of the deny list.
    #[serde(default)]
    pub also_suppress: Vec<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: HiveCli,
    pub params: QueryParams,
    pub filter: LineFilter,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wmcs-edits")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| WmcsError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            WmcsError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Merges another config into this one, with the other taking precedence.
    ///
    /// Extra engine args and extra suppress patterns accumulate.
    pub fn merge(&mut self, other: &Config) {
        if other.engine.program.is_some() {
            self.engine.program = other.engine.program.clone();
        }
        if other.engine.query_flag.is_some() {
            self.engine.query_flag = other.engine.query_flag.clone();
        }
        self.engine.args.extend(other.engine.args.iter().cloned());

        if other.query.month.is_some() {
            self.query.month = other.query.month.clone();
        }
        if other.query.limit.is_some() {
            self.query.limit = other.query.limit;
        }
        if other.query.table.is_some() {
            self.query.table = other.query.table.clone();
        }
        if other.query.origin.is_some() {
            self.query.origin = other.query.origin.clone();
        }
        if other.query.with_total.is_some() {
            self.query.with_total = other.query.with_total;
        }

        if other.output.suppress.is_some() {
            self.output.suppress = other.output.suppress.clone();
        }
        self.output
            .also_suppress
            .extend(other.output.also_suppress.iter().cloned());
    }

    /// Applies environment variables as defaults for unset values.
    pub fn apply_env_defaults(&mut self) {
        self.apply_env_defaults_from(|key| std::env::var(key).ok());
    }

    /// Applies defaults from an arbitrary variable lookup.
    pub fn apply_env_defaults_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.engine.program.is_none() {
            self.engine.program = lookup(ENV_ENGINE).filter(|v| !v.is_empty());
        }
        if self.query.month.is_none() {
            self.query.month = lookup(ENV_MONTH).filter(|v| !v.is_empty());
        }
    }

    /// Resolves the configuration into settings, filling built-in defaults
    /// and validating the query parameters.
    pub fn to_settings(&self) -> Result<Settings> {
        let engine = HiveCli::new(
            self.engine
                .program
                .clone()
                .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
        )
        .with_query_flag(
            self.engine
                .query_flag
                .clone()
                .unwrap_or_else(|| DEFAULT_QUERY_FLAG.to_string()),
        )
        .with_args(self.engine.args.iter().cloned());

        let params = QueryParams {
            month: self
                .query
                .month
                .clone()
                .unwrap_or_else(|| DEFAULT_MONTH.to_string()),
            limit: self.query.limit.unwrap_or(DEFAULT_LIMIT),
            table: self
                .query
                .table
                .clone()
                .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            origin: self
                .query
                .origin
                .clone()
                .unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            with_total: self.query.with_total.unwrap_or(false),
        };
        params.validate()?;

        let mut filter = match &self.output.suppress {
            Some(patterns) => LineFilter::new(patterns.iter().cloned()),
            None => LineFilter::new([PARQUET_NOISE]),
        };
        for pattern in &self.output.also_suppress {
            filter.push(pattern.clone());
        }

        Ok(Settings {
            engine,
            params,
            filter,
        })
    }
}
