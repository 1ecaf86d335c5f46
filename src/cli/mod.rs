//! CLI-specific utilities for listing-dl
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod logging;
pub mod progress;

pub use logging::SuspendingLogger;
pub use progress::ProgressManager;
