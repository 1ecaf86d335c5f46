//! Check-download-record workflow
//!
//! Fetches the listing, picks the newest file, skips it when the ledger
//! already has its date, otherwise downloads it and records the date.

use std::fmt;
use std::path::PathBuf;

use log::info;

use crate::core::downloader::{DownloadOutcome, Downloader};
use crate::core::error::{Error, Result};
use crate::core::ledger::Ledger;
use crate::core::listing::ListingParser;
use crate::core::select::{select_newest, SelectedFile};
use crate::core::source::ListingConfig;
use crate::core::stream::DownloadOptions;

/// Exit code for a fresh download
pub const EXIT_DOWNLOADED: i32 = 0;
/// Exit code for fatal errors (network, ledger)
pub const EXIT_ERROR: i32 = 1;
/// Exit code when the download produced no usable file
pub const EXIT_DOWNLOAD_FAILED: i32 = 2;
/// Exit code when the newest file was fetched on an earlier run
pub const EXIT_ALREADY_DOWNLOADED: i32 = 3;
/// Exit code when the listing had no usable rows
pub const EXIT_NO_NEW_FILE: i32 = 4;

/// Terminal state of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The listing yielded no candidates
    NoNewFile,

    /// The newest file's date is already in the ledger
    AlreadyDownloaded(SelectedFile),

    /// Dry run: the newest file would have been downloaded
    WouldDownload(SelectedFile),

    /// Nothing usable was downloaded; the ledger is unchanged
    DownloadFailed { file: SelectedFile, reason: String },

    /// The file was downloaded and its date recorded
    Downloaded {
        file: SelectedFile,
        path: PathBuf,
        bytes: u64,
        /// False when a partial file was kept after a mid-stream fault
        complete: bool,
    },
}

impl RunOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Downloaded { .. } | RunOutcome::WouldDownload(_) => EXIT_DOWNLOADED,
            RunOutcome::DownloadFailed { .. } => EXIT_DOWNLOAD_FAILED,
            RunOutcome::AlreadyDownloaded(_) => EXIT_ALREADY_DOWNLOADED,
            RunOutcome::NoNewFile => EXIT_NO_NEW_FILE,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::NoNewFile => write!(f, "No new files found"),
            RunOutcome::AlreadyDownloaded(file) => {
                write!(f, "File for {} has already been downloaded previously", file.date_key)
            }
            RunOutcome::WouldDownload(file) => {
                write!(f, "Would download {} ({})", file.url, file.date_key)
            }
            RunOutcome::DownloadFailed { file, reason } => {
                write!(f, "No file was downloaded for {}: {reason}", file.date_key)
            }
            RunOutcome::Downloaded {
                path,
                bytes,
                complete: true,
                ..
            } => write!(f, "Downloaded {} ({bytes} bytes)", path.display()),
            RunOutcome::Downloaded {
                path,
                bytes,
                complete: false,
                ..
            } => write!(
                f,
                "Kept incomplete download {} ({bytes} bytes)",
                path.display()
            ),
        }
    }
}

/// Run the whole workflow with a downloader built from `config`
pub async fn check_and_download(
    config: &ListingConfig,
    options: &DownloadOptions,
) -> Result<RunOutcome> {
    let downloader = Downloader::from_config(config)?;
    run(&downloader, config, options).await
}

/// Run the whole workflow with an existing downloader
pub async fn run(
    downloader: &Downloader,
    config: &ListingConfig,
    options: &DownloadOptions,
) -> Result<RunOutcome> {
    info!("Getting the newest file link...");
    let html = downloader.fetch_listing(&config.listing_url).await?;

    let parser = ListingParser::with_formats(config.date_formats.clone());
    let candidates = parser.parse(&html);
    let Some(file) = select_newest(&candidates, &config.listing_url) else {
        return Ok(RunOutcome::NoNewFile);
    };
    info!("Newest file found: {} ({})", file.url, file.date_key);

    let ledger = Ledger::new(&config.ledger_path);
    if ledger.is_recorded(&file.date_key).await? {
        return Ok(RunOutcome::AlreadyDownloaded(file));
    }
    info!("File has not been downloaded before");

    if options.dry_run {
        return Ok(RunOutcome::WouldDownload(file));
    }

    let (path, bytes, complete) = match downloader.download(&file.url, options).await {
        Ok(DownloadOutcome::Completed { path, bytes }) => (path, bytes, true),
        Ok(DownloadOutcome::Partial { path, bytes, .. }) => (path, bytes, false),
        Ok(DownloadOutcome::NoContent) => {
            return Ok(RunOutcome::DownloadFailed {
                file,
                reason: "no content to download".to_string(),
            });
        }
        Err(err @ Error::StreamInterrupted { .. }) => {
            return Ok(RunOutcome::DownloadFailed {
                file,
                reason: err.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    info!("Logging download...");
    ledger.record(&file.date_key).await?;

    Ok(RunOutcome::Downloaded {
        file,
        path,
        bytes,
        complete,
    })
}
