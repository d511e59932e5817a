//! wmcs-edits - per-wiki Cloud VPS edit counts from the Hive warehouse.

use wmcs_edits::cli::Cli;
use wmcs_edits::config::{Config, Settings};
use wmcs_edits::error::Result;
use wmcs_edits::{logging, runner};

use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    logging::init_stderr_logging();

    let code = match run().await {
        Ok(code) => code,
        Err(e) if e.is_broken_pipe() => {
            debug!("Output closed early, stopping");
            e.exit_code()
        }
        Err(e) => {
            error!("{}: {}", e.category(), e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse_args();
    let settings = resolve_settings(&cli)?;
    let mut stdout = tokio::io::stdout();

    if cli.print_query {
        runner::print_query(&settings.params, &mut stdout).await?;
        return Ok(0);
    }

    runner::run_query(
        &settings.engine,
        &settings.params,
        &settings.filter,
        &mut stdout,
    )
    .await
}

/// Resolves settings with precedence:
/// 1. CLI arguments (highest)
/// 2. Config file
/// 3. Environment variables
/// 4. Built-in defaults
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;

    config.merge(&cli.to_config());
    config.apply_env_defaults();

    config.to_settings()
}
