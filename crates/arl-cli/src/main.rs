//! arl - market-basket association rules from the command line
//!
//! Usage:
//!   arl run config.json                 # Full pipeline from a JSON config
//!   arl baskets events.csv              # Monthly baskets per customer
//!   arl rules events.csv --metric lift  # Mine and list rules by lift
//!   arl recommend events.csv 2_0 -n 3   # Services that go with 2_0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::{baskets, recommend, rules, run};

/// arl - service basket analysis and recommendations
#[derive(Parser)]
#[command(name = "arl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Thresholds shared by the mining commands
#[derive(Args, Debug, Clone)]
pub(crate) struct MiningArgs {
    /// Minimum itemset support (0, 1]
    #[arg(long, default_value_t = basket_arl::mining::DEFAULT_MIN_SUPPORT)]
    min_support: f64,

    /// Rule filter metric: support, confidence, lift, leverage, conviction
    #[arg(long, default_value = "support")]
    metric: String,

    /// Minimum value of the rule metric
    #[arg(long, default_value_t = basket_arl::mining::DEFAULT_MIN_THRESHOLD)]
    min_threshold: f64,

    /// Largest itemset size to mine
    #[arg(long)]
    max_len: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the whole pipeline from a JSON configuration file
    Run {
        /// Path to the configuration
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Show the monthly baskets built from a transaction CSV
    Baskets {
        /// Transaction CSV (UserId, ServiceId, CategoryId, CreateDate)
        #[arg(value_name = "CSV")]
        file: PathBuf,

        /// Limit baskets shown
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Mine association rules and list them by lift
    Rules {
        /// Transaction CSV
        #[arg(value_name = "CSV")]
        file: PathBuf,

        #[command(flatten)]
        mining: MiningArgs,

        /// Limit rules shown
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Recommend services that go with ITEM
    Recommend {
        /// Transaction CSV
        #[arg(value_name = "CSV")]
        file: PathBuf,

        /// Item key, ServiceId_CategoryId
        #[arg(value_name = "ITEM")]
        item: String,

        /// Number of recommendations
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        #[command(flatten)]
        mining: MiningArgs,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Run { config } => run::run(&config, cli.json),
        Commands::Baskets { file, limit } => baskets::run(&file, limit, cli.json),
        Commands::Rules {
            file,
            mining,
            limit,
        } => rules::run(&file, &mining, limit, cli.json),
        Commands::Recommend {
            file,
            item,
            count,
            mining,
        } => recommend::run(&file, &item, count, &mining, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            e.exit_code()
        }
    }
}
