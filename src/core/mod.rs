//! Core library modules for listing-dl
//!
//! This module contains the internal implementation details of the listing-dl library.

pub mod error;
pub mod source;
pub mod stream;
pub mod listing;
pub mod select;
pub mod ledger;
pub mod downloader;
pub mod workflow;

// Re-export main types for internal use
pub use downloader::{DownloadOutcome, Downloader};
pub use ledger::Ledger;
