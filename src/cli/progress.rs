//! CLI-specific progress handling for listing-dl
//!
//! Renders download progress as a fixed-width bar with a megabyte counter.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use listing_dl::{DownloadProgress, ProgressCallback};

/// Width of the bar in columns
pub const BAR_WIDTH: usize = 50;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Creates a progress bar for CLI display
pub fn create_progress_bar(total_size: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!("[{{bar:{BAR_WIDTH}}}] {{msg}}"))
            .expect("Failed to create progress style")
            .progress_chars("#-"),
    );
    pb
}

/// Whole megabytes downloaded over whole megabytes total, e.g. `12/480 MB`
pub fn mb_label(progress: DownloadProgress) -> String {
    format!(
        "{}/{} MB",
        progress.bytes_so_far / BYTES_PER_MB,
        progress.total_bytes / BYTES_PER_MB
    )
}

/// Progress manager bridging download callbacks to the terminal
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager. The bar stays hidden until the first
    /// update sets its length, so runs without a download draw nothing.
    pub fn new() -> Self {
        let pb = create_progress_bar(0);
        pb.set_draw_target(ProgressDrawTarget::hidden());
        Self { pb }
    }

    /// Callback that redraws the bar after every chunk
    pub fn callback(&self) -> ProgressCallback {
        let pb = self.pb.clone();
        Arc::new(move |progress: DownloadProgress| {
            if pb.length().unwrap_or(0) != progress.total_bytes {
                pb.set_length(progress.total_bytes);
                if pb.is_hidden() {
                    pb.set_draw_target(ProgressDrawTarget::stderr());
                }
            }
            pb.set_position(progress.bytes_so_far);
            pb.set_message(mb_label(progress));
            if progress.bytes_so_far >= progress.total_bytes {
                pb.finish();
            }
        })
    }

    /// Leave the bar on screen as it is, e.g. after a fault
    pub fn abandon(&self) {
        if self.pb.position() > 0 && !self.pb.is_finished() {
            self.pb.abandon();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_progress_bar_template() {
        let pb = create_progress_bar(1000);

        assert_eq!(pb.length().unwrap(), 1000);
        pb.set_position(100);
        pb.finish();
    }

    #[test]
    fn test_mb_label_truncates() {
        let label = mb_label(DownloadProgress {
            total_bytes: 480 * BYTES_PER_MB + 5,
            bytes_so_far: 12 * BYTES_PER_MB + BYTES_PER_MB / 2,
        });
        assert_eq!(label, "12/480 MB");

        let label = mb_label(DownloadProgress {
            total_bytes: 1000,
            bytes_so_far: 10,
        });
        assert_eq!(label, "0/0 MB");
    }

    #[test]
    fn test_callback_tracks_position() {
        let manager = ProgressManager::new();
        let callback = manager.callback();

        callback(DownloadProgress {
            total_bytes: 500,
            bytes_so_far: 200,
        });
        assert_eq!(manager.pb.length().unwrap(), 500);
        assert_eq!(manager.pb.position(), 200);
        assert!(!manager.pb.is_finished());

        callback(DownloadProgress {
            total_bytes: 500,
            bytes_so_far: 500,
        });
        assert!(manager.pb.is_finished());
    }
}
