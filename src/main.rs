//! # Listing-dl CLI
//!
//! Command-line interface for the listing-dl library.
//! Meant to be run periodically: each run fetches the newest listed file at most once.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use listing_dl::{
    DownloadOptions, FaultPolicy, ListingConfig, RunOutcome, DEFAULT_LEDGER_PATH,
    DEFAULT_LISTING_URL, EXIT_ERROR,
};
use log::error;

mod cli;

/// Command-line interface for listing-dl
#[derive(Parser, Debug)]
#[command(name = "listing-dl")]
#[command(about = "Downloads the newest file from a directory-listing page, once")]
#[command(long_about = "Checks a directory-listing page for its newest file and downloads it
unless its date is already in the ledger:
  listing-dl                                   # Check the default listing
  listing-dl --listing-url https://host/data/  # Check another listing
  listing-dl --dry-run                         # Report what would be downloaded

Exit codes:
  0  downloaded (or dry run found a file)
  1  error
  2  download failed, nothing recorded
  3  newest file was already downloaded
  4  no files found in the listing")]
#[command(version = env!("LISTING_DL_VERSION"))]
struct Cli {
    /// Listing page URL; relative links are appended to it
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    listing_url: String,

    /// Ledger file with one downloaded date per line
    #[arg(long, default_value = DEFAULT_LEDGER_PATH)]
    ledger: PathBuf,

    /// Directory the downloaded file is saved to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Overall timeout for the transfer, in seconds
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Extra chrono date format for the listing's date column (repeatable)
    #[arg(long = "date-format", value_name = "FORMAT")]
    date_formats: Vec<String>,

    /// Keep a partially downloaded file and still record its date
    #[arg(long)]
    keep_partial: bool,

    /// Check the listing and ledger without downloading anything
    #[arg(long)]
    dry_run: bool,

    /// Exit without waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> ListingConfig {
        ListingConfig {
            listing_url: self.listing_url.clone(),
            ledger_path: self.ledger.clone(),
            output_dir: self.output_dir.clone(),
            download_timeout: Duration::from_secs(self.timeout),
            date_formats: self.date_formats.clone(),
        }
    }

    fn fault_policy(&self) -> FaultPolicy {
        if self.keep_partial {
            FaultPolicy::KeepPartial
        } else {
            FaultPolicy::Discard
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let progress_manager = cli::ProgressManager::new();
    init_logging(cli.verbose, &progress_manager);

    let code = match run(&cli, &progress_manager).await {
        Ok(outcome) => {
            report(&outcome);
            outcome.exit_code()
        }
        Err(e) => {
            error!("❌ Error: {e:#}");
            EXIT_ERROR
        }
    };

    if !cli.no_pause && std::io::stdin().is_terminal() {
        wait_for_acknowledgment();
    }

    std::process::exit(code);
}

/// Initialize logging to stderr; status lines print without decoration and
/// suspend the progress bar while they are written
fn init_logging(verbose: bool, progress_manager: &cli::ProgressManager) {
    let level = if verbose { "debug" } else { "info" };
    let logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("warn,listing_dl={level}")),
    )
    .target(env_logger::Target::Stderr)
    .format_timestamp(None)
    .format_target(false)
    .format_level(verbose)
    .build();

    if let Err(e) = cli::SuspendingLogger::new(logger, progress_manager.pb.clone()).init() {
        eprintln!("Failed to initialize logging: {e}");
    }
}

async fn run(cli: &Cli, progress_manager: &cli::ProgressManager) -> anyhow::Result<RunOutcome> {
    let config = cli.config();

    if cli.verbose {
        eprintln!("📋 Listing-dl v{} starting...", env!("LISTING_DL_VERSION"));
        eprintln!("🌐 Listing: {}", config.listing_url);
        eprintln!("📒 Ledger: {}", config.ledger_path.display());
        eprintln!("📁 Saving to: {}", config.output_dir.display());
    }

    let options = DownloadOptions {
        progress: Some(progress_manager.callback()),
        fault_policy: cli.fault_policy(),
        dry_run: cli.dry_run,
        ..Default::default()
    };

    let result = listing_dl::check_and_download(&config, &options)
        .await
        .with_context(|| format!("Checking {} failed", config.listing_url));
    progress_manager.abandon();

    result
}

/// Print the final status line for a run
fn report(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Downloaded { complete: true, .. } => eprintln!("✅ {outcome}"),
        RunOutcome::Downloaded { complete: false, .. } => eprintln!("⚠️  {outcome}"),
        RunOutcome::DownloadFailed { .. } => eprintln!("❌ {outcome}"),
        RunOutcome::WouldDownload(_) => eprintln!("🔍 [DRY RUN] {outcome}"),
        RunOutcome::AlreadyDownloaded(_) | RunOutcome::NoNewFile => eprintln!("ℹ️  {outcome}"),
    }
}

/// Block until the user presses Enter
fn wait_for_acknowledgment() {
    eprint!("Press Enter to close...");
    let _ = std::io::stderr().flush();

    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input);
}
