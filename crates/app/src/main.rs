//! `drill`: driving-test practice from the command line.

use std::path::PathBuf;
use std::process;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drill_core::model::UserId;

mod commands;
mod config;
mod db;

use commands::Context;
use config::AppConfig;

#[derive(Parser)]
#[command(name = "drill", version, about = "Driving-test practice drills")]
struct Cli {
    /// Directory of `<STATE>.json` question files
    #[arg(long, global = true, env = "DRILL_QUESTIONS", default_value = "questions")]
    questions: PathBuf,

    /// Directory holding the progress database
    #[arg(long, global = true, env = "DRILL_DATA_DIR", default_value = ".drill")]
    data_dir: PathBuf,

    /// SQLite URL or path; overrides --data-dir
    #[arg(long, global = true, env = "DRILL_DB")]
    db: Option<String>,

    /// TOML config file with a [progress] table
    #[arg(long, global = true, env = "DRILL_CONFIG")]
    config: Option<PathBuf>,

    /// Whose progress to read and write
    #[arg(long, global = true, default_value = "local")]
    user: String,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every question file and report what was found
    Validate,

    /// Answer random questions until you quit
    Train {
        /// Two-letter state code
        #[arg(long)]
        state: String,
    },

    /// Show pass probability, unlocks and test history
    Stats {
        /// Include category progress for this state
        #[arg(long)]
        state: Option<String>,

        /// The referral unlock has been earned
        #[arg(long)]
        referral: bool,
    },

    /// Record a finished practice test
    Record {
        /// Test number, 1-4
        #[arg(long)]
        test: u8,

        /// Correct answers out of 50
        #[arg(long)]
        score: u32,
    },

    /// Erase all training progress and test history
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let ctx = Context {
        db_url: cli
            .db
            .as_deref()
            .map_or_else(|| db::default_db_url(&cli.data_dir), db::normalize_sqlite_url),
        questions: cli.questions,
        policy: config.progress,
        user: UserId::new(&cli.user).context("invalid --user")?,
    };
    tracing::debug!(db = %ctx.db_url, questions = %ctx.questions.display(), "resolved paths");

    match cli.command {
        Commands::Validate => commands::validate::execute(&ctx),
        Commands::Train { state } => commands::train::execute(&ctx, &state).await,
        Commands::Stats { state, referral } => {
            commands::stats::execute(&ctx, state.as_deref(), referral).await
        }
        Commands::Record { test, score } => commands::record::execute(&ctx, test, score).await,
        Commands::Reset { yes } => commands::reset::execute(&ctx, yes).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
