//! # Listing-dl Library
//!
//! Watches a directory-listing web page and fetches its newest file exactly once.
//!
//! ## Features
//!
//! - **Listing parsing**: reads `(link, date)` rows from Apache/nginx-style tables
//! - **Newest selection**: latest date wins, first row wins on ties
//! - **Download ledger**: plain text file of dates already fetched
//! - **Streaming**: fixed-size chunks, memory use independent of file size
//! - **Progress tracking**: optional progress callbacks for custom UIs
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use listing_dl::{DownloadOptions, ListingConfig, RunOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ListingConfig {
//!         listing_url: "https://web.ais.dk/aisdata/".to_string(),
//!         ..Default::default()
//!     };
//!
//!     match listing_dl::check_and_download(&config, &DownloadOptions::default()).await? {
//!         RunOutcome::Downloaded { path, .. } => println!("Fetched {}", path.display()),
//!         other => println!("{other}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Progress Tracking
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use listing_dl::{DownloadOptions, DownloadProgress, ListingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = DownloadOptions {
//!         progress: Some(Arc::new(|p: DownloadProgress| {
//!             println!("Progress: {}/{} bytes", p.bytes_so_far, p.total_bytes);
//!         })),
//!         ..Default::default()
//!     };
//!     listing_dl::check_and_download(&ListingConfig::default(), &options).await?;
//!     Ok(())
//! }
//! ```

// Re-export core types that users might need
pub use crate::core::error::{Error, Result};
pub use crate::core::listing::{parse_listing, parse_listing_date, Candidate, ListingParser};
pub use crate::core::select::{newest, select_newest, SelectedFile};
pub use crate::core::source::{
    resolve_download_url, resolve_output_filename, ListingConfig, DEFAULT_DOWNLOAD_TIMEOUT,
    DEFAULT_LEDGER_PATH, DEFAULT_LISTING_URL,
};
pub use crate::core::stream::{
    DownloadOptions, DownloadProgress, FaultPolicy, ProgressCallback, DEFAULT_BUFFER_SIZE,
};
pub use crate::core::workflow::{
    check_and_download, run, RunOutcome, EXIT_ALREADY_DOWNLOADED, EXIT_DOWNLOADED,
    EXIT_DOWNLOAD_FAILED, EXIT_ERROR, EXIT_NO_NEW_FILE,
};

/// Lower-level building blocks: the HTTP side and the ledger
///
/// # Examples
/// ```rust,no_run
/// use std::time::Duration;
/// use listing_dl::{DownloadOptions, Downloader, Ledger};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = Downloader::new(Duration::from_secs(300), ".")?;
/// let ledger = Ledger::new("downloaded_dates.log");
///
/// if !ledger.is_recorded("2024-01-05").await? {
///     downloader
///         .download("https://web.ais.dk/aisdata/aisdk-2024-01-05.zip", &DownloadOptions::default())
///         .await?;
///     ledger.record("2024-01-05").await?;
/// }
/// # Ok(())
/// # }
/// ```
pub use crate::core::{DownloadOutcome, Downloader, Ledger};

// Internal modules
mod core;
