//! Command-line argument parsing for wmcs-edits.
//!
//! Every argument is optional; running with none performs the fixed
//! monthly query.

use crate::config::{Config, EngineConfig, OutputConfig, QueryConfig};
use clap::Parser;
use std::path::PathBuf;

/// Tabulate per-wiki Cloud VPS edits against total edits from Hive.
#[derive(Parser, Debug)]
#[command(name = "wmcs-edits")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Month to query (YYYY-MM) [default: 2019-08]
    #[arg(short = 'm', long, value_name = "YYYY-MM")]
    pub month: Option<String>,

    /// Maximum number of rows [default: 100]
    #[arg(short = 'n', long, value_name = "ROWS")]
    pub limit: Option<u32>,

    /// Source table [default: joal.test_geoeditors_daily_network_origin]
    #[arg(short = 't', long, value_name = "TABLE")]
    pub table: Option<String>,

    /// network_origin value counted as WMCS [default: wikimedia_labs]
    #[arg(long, value_name = "ORIGIN")]
    pub origin: Option<String>,

    /// Query engine program [default: hive]
    #[arg(long, value_name = "PROGRAM")]
    pub engine: Option<String>,

    /// Extra argument for the engine, placed before the query (repeatable)
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Drop output lines containing this text, in addition to parquet.hadoop (repeatable)
    #[arg(long, value_name = "TEXT")]
    pub suppress: Vec<String>,

    /// Append a TOTAL row summed over all wikis of the month
    #[arg(long)]
    pub with_total: bool,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the query instead of running it
    #[arg(long)]
    pub print_query: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Converts CLI arguments to a partial Config, for merging over the file.
    pub fn to_config(&self) -> Config {
        Config {
            engine: EngineConfig {
                program: self.engine.clone(),
                query_flag: None,
                args: self.engine_args.clone(),
            },
            query: QueryConfig {
                month: self.month.clone(),
                limit: self.limit,
                table: self.table.clone(),
                origin: self.origin.clone(),
                with_total: self.with_total.then_some(true),
            },
            output: OutputConfig {
                suppress: None,
                also_suppress: self.suppress.clone(),
            },
        }
    }
}
