//! Listing source configuration for listing-dl
//!
//! Holds where the listing lives, where the ledger is kept and how
//! download URLs and local file names are derived.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use crate::core::error::{Error, Result};

/// Default listing page checked when none is configured
pub const DEFAULT_LISTING_URL: &str = "https://web.ais.dk/aisdata/";

/// Default ledger file, relative to the working directory
pub const DEFAULT_LEDGER_PATH: &str = "downloaded_dates.log";

/// Default overall timeout for a single transfer
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Configuration for one check-and-download run
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Listing page URL; also the base that relative links are appended to
    pub listing_url: String,

    /// Ledger of already downloaded dates
    pub ledger_path: PathBuf,

    /// Directory the artifact is written to
    pub output_dir: PathBuf,

    /// Overall timeout for a request, body included
    pub download_timeout: Duration,

    /// Extra chrono format strings tried before the built-in ones
    pub date_formats: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            output_dir: PathBuf::from("."),
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            date_formats: Vec::new(),
        }
    }
}

/// Builds the download URL for a listing link.
///
/// Relative links are appended to the listing URL verbatim; links that are
/// already absolute are returned unchanged.
pub fn resolve_download_url(listing_url: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("{listing_url}{link}")
    }
}

/// Takes the local file name from the last segment of the URL path
pub fn resolve_output_filename(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidInput(format!("Bad URL '{url}': {e}")))?;

    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .ok_or_else(|| Error::InvalidInput(format!("URL has no file name: {url}")))
}

/// Full local path for a download URL inside `output_dir`
pub fn resolve_output_path(output_dir: &Path, url: &str) -> Result<PathBuf> {
    Ok(output_dir.join(resolve_output_filename(url)?))
}
