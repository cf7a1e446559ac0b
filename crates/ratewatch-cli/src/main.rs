mod ids;
mod live;
mod lookup;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ratewatch")]
#[command(about = "Published and live chess ratings for tournament players")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments for the default `live` command
    #[command(flatten)]
    live: LiveArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Published plus live ratings for one or more members (default)
    Live(LiveArgs),
    /// Published ratings for one member
    Published {
        /// Member id
        id: String,
    },
    /// Scan a member's recent events and show what each one contributed
    History {
        /// Member id
        id: String,
    },
    /// Print the earliest event date the live crawl considers
    Cutoff {
        /// Compute for this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Args)]
struct LiveArgs {
    /// Member ids; commas and whitespace both separate ids
    ids: Vec<String>,
    /// Print one line of live values per member instead of a table
    #[arg(long)]
    csv: bool,
    /// Read ids from the first line of this CSV file
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,
    /// Where to write results for large batches
    #[arg(long, value_name = "FILE", default_value = output::DEFAULT_OUTPUT_FILE)]
    output: PathBuf,
}

impl LiveArgs {
    /// `--csv`, or a bare `csv` word among the ids.
    fn wants_csv(&self) -> bool {
        self.csv || self.ids.iter().any(|a| a.trim().eq_ignore_ascii_case("csv"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ratewatch_core::load_app_config().context("failed to load configuration")?;
    init_tracing(&config.log_level);

    match cli.command {
        Some(Commands::Live(args)) => live::run_live(&config, &args).await?,
        None => live::run_live(&config, &cli.live).await?,
        Some(Commands::Published { id }) => lookup::run_published(&config, &id).await?,
        Some(Commands::History { id }) => live::run_history(&config, &id).await?,
        Some(Commands::Cutoff { today }) => lookup::run_cutoff(today),
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for CSV output. `RUST_LOG` wins
/// over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
