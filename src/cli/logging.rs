//! Log output that cooperates with the progress bar
//!
//! Records are written while the bar is suspended, so a warning raised
//! mid-download lands on its own line instead of on top of the bar.

use indicatif::ProgressBar;
use log::{Log, Metadata, Record};

/// env_logger wrapped so each record clears and redraws `pb`
pub struct SuspendingLogger {
    inner: env_logger::Logger,
    pb: ProgressBar,
}

impl SuspendingLogger {
    pub fn new(inner: env_logger::Logger, pb: ProgressBar) -> Self {
        Self { inner, pb }
    }

    /// Install as the global logger, keeping the env_logger level filter
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.inner.filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for SuspendingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.inner.matches(record) {
            self.pb.suspend(|| self.inner.log(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}
