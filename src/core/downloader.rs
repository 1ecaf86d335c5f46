//! Core download functionality for listing-dl
//!
//! Fetches listing pages and streams a single file to disk in bounded chunks.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::header::ACCEPT_ENCODING;
use reqwest::{Client, ClientBuilder};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::core::error::{Error, Result};
use crate::core::source::{resolve_output_path, ListingConfig};
use crate::core::stream::{create_http_stream, DownloadOptions, DownloadProgress, FaultPolicy};

/// How a single download ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Every declared byte was written
    Completed { path: PathBuf, bytes: u64 },

    /// The server declared no content; no file was created
    NoContent,

    /// The transfer broke off and the partial file was kept
    Partial {
        path: PathBuf,
        bytes: u64,
        total: u64,
        reason: String,
    },
}

/// Fetches listings and downloads files over a shared HTTP client
pub struct Downloader {
    client: Client,
    output_dir: PathBuf,
}

impl Downloader {
    /// Create a downloader whose requests (body included) time out after `timeout`
    pub fn new(timeout: Duration, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .user_agent(format!("listing-dl/{}", env!("LISTING_DL_VERSION")))
            .build()?;

        Ok(Self {
            client,
            output_dir: output_dir.into(),
        })
    }

    /// Create a downloader from a run configuration
    pub fn from_config(config: &ListingConfig) -> Result<Self> {
        Self::new(config.download_timeout, config.output_dir.clone())
    }

    /// Fetch the listing page as text
    pub async fn fetch_listing(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!(
                "Failed to fetch listing {url}: {status}"
            )));
        }

        Ok(response.text().await?)
    }

    /// Download `url` into the output directory.
    ///
    /// The body is streamed in `options.buffer_size` chunks. A missing or zero
    /// content length yields [`DownloadOutcome::NoContent`] without touching
    /// the disk. Faults after the file was created follow `options.fault_policy`.
    pub async fn download(&self, url: &str, options: &DownloadOptions) -> Result<DownloadOutcome> {
        let path = resolve_output_path(&self.output_dir, url)?;

        debug!("GET {url}");
        // Identity encoding keeps the declared length equal to the bytes on disk
        let response = self
            .client
            .get(url)
            .header(ACCEPT_ENCODING, "identity")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("Failed to download {url}: {status}")));
        }

        let total_bytes = match response.content_length() {
            Some(len) if len > 0 => len,
            _ => {
                info!("No bytes available to download from {url}");
                return Ok(DownloadOutcome::NoContent);
            }
        };

        if !self.output_dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&self.output_dir).await?;
        }

        info!("Downloading {}...", path.display());
        let stream = create_http_stream(response);
        write_stream(stream, &path, total_bytes, options).await
    }
}

/// Copy `reader` into a fresh file at `path`, expecting `total_bytes`
pub(crate) async fn write_stream<R>(
    mut reader: R,
    path: &Path,
    total_bytes: u64,
    options: &DownloadOptions,
) -> Result<DownloadOutcome>
where
    R: AsyncRead + Unpin,
{
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;

    let mut written = 0u64;
    let result = copy_chunks(&mut reader, &mut file, total_bytes, &mut written, options).await;
    drop(file);

    let reason = match result {
        Ok(()) if written >= total_bytes => {
            info!("File downloaded successfully as {}", path.display());
            return Ok(DownloadOutcome::Completed {
                path: path.to_path_buf(),
                bytes: written,
            });
        }
        Ok(()) => format!("body ended after {written} of {total_bytes} bytes"),
        Err(e) => e.to_string(),
    };

    match options.fault_policy {
        FaultPolicy::Discard => {
            warn!("An error occurred while downloading {}: {reason}", path.display());
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Could not remove partial file {}: {e}", path.display());
            }
            Err(Error::StreamInterrupted {
                path: path.to_path_buf(),
                bytes_written: written,
                reason,
            })
        }
        FaultPolicy::KeepPartial => {
            warn!(
                "An error occurred while downloading {}: {reason} (keeping {written} bytes)",
                path.display()
            );
            Ok(DownloadOutcome::Partial {
                path: path.to_path_buf(),
                bytes: written,
                total: total_bytes,
                reason,
            })
        }
    }
}

async fn copy_chunks<R, W>(
    reader: &mut R,
    writer: &mut W,
    total_bytes: u64,
    written: &mut u64,
    options: &DownloadOptions,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; options.buffer_size.max(1)];

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }

        writer.write_all(&buffer[..bytes_read]).await?;
        *written += bytes_read as u64;

        if let Some(ref progress) = options.progress {
            progress(DownloadProgress {
                total_bytes,
                bytes_so_far: *written,
            });
        }
    }

    writer.flush().await
}
