//! Streaming types for listing-dl
//!
//! Provides the body reader, progress reporting and download options.

use std::sync::Arc;

use futures::TryStreamExt;
use tokio::io::AsyncRead;

/// Chunk size used when copying a response body to disk
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Byte counts reported after every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Declared content length
    pub total_bytes: u64,

    /// Bytes written to disk so far
    pub bytes_so_far: u64,
}

/// Progress callback function type
pub type ProgressCallback = Arc<dyn Fn(DownloadProgress) + Send + Sync>;

/// What to do when a transfer breaks off mid-stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Delete the partial file and report the download as failed (default)
    #[default]
    Discard,
    /// Keep the partial file and report the download as done
    KeepPartial,
}

/// Options for download operations
#[derive(Clone)]
pub struct DownloadOptions {
    /// Optional progress callback
    pub progress: Option<ProgressCallback>,

    /// Buffer size for streaming operations
    pub buffer_size: usize,

    /// Behavior on a mid-stream fault
    pub fault_policy: FaultPolicy,

    /// Check the listing and ledger only; never download or record
    pub dry_run: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            progress: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            fault_policy: FaultPolicy::default(),
            dry_run: false,
        }
    }
}

impl std::fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("progress", &self.progress.is_some())
            .field("buffer_size", &self.buffer_size)
            .field("fault_policy", &self.fault_policy)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Wraps a response body as an AsyncRead
pub fn create_http_stream(response: reqwest::Response) -> impl AsyncRead + Send + Unpin {
    tokio_util::io::StreamReader::new(
        response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
    )
}
