//! Download ledger
//!
//! Plain text file with one `YYYY-MM-DD` key per line. Keys are only ever
//! appended; duplicate lines are harmless because lookups compare whole lines.

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::core::error::{Error, Result};

/// Persisted set of already downloaded date keys
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if `date_key` appears on some line. A missing ledger means nothing
    /// has been downloaded yet.
    pub async fn is_recorded(&self, date_key: &str) -> Result<bool> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Ledger {} does not exist yet", self.path.display());
                return Ok(false);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        Ok(contents.lines().any(|line| line == date_key))
    }

    /// Appends `date_key` as a new line, creating the ledger if needed.
    ///
    /// A ledger whose last line lacks its terminator (hand edits, a crash
    /// mid-write) gets one first, so the existing key stays on its own line.
    pub async fn record(&self, date_key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        let line = if self.ends_unterminated(&mut file).await? {
            warn!("Ledger {} lacks a final newline, terminating it", self.path.display());
            format!("\n{date_key}\n")
        } else {
            format!("{date_key}\n")
        };

        // One write per record so the append stays atomic under O_APPEND
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        debug!("Recorded {date_key} in {}", self.path.display());
        Ok(())
    }

    /// True if the file is non-empty and its last byte is not `\n`
    async fn ends_unterminated(&self, file: &mut tokio::fs::File) -> Result<bool> {
        let len = file.metadata().await.map_err(|e| self.io_error(e))?.len();
        if len == 0 {
            return Ok(false);
        }

        file.seek(SeekFrom::End(-1))
            .await
            .map_err(|e| self.io_error(e))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)
            .await
            .map_err(|e| self.io_error(e))?;

        Ok(last[0] != b'\n')
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::LedgerIo {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_ledger_records_nothing() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("downloaded_dates.log"));

        assert!(!ledger.is_recorded("2024-01-05").await.unwrap());
        assert!(!ledger.path().exists(), "Lookup must not create the ledger");
    }

    #[tokio::test]
    async fn test_record_then_lookup() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("downloaded_dates.log"));

        ledger.record("2024-01-05").await.unwrap();

        assert!(ledger.is_recorded("2024-01-05").await.unwrap());
        assert!(!ledger.is_recorded("2024-02-10").await.unwrap());
    }

    #[tokio::test]
    async fn test_record_is_append_only() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("downloaded_dates.log"));

        ledger.record("2024-01-05").await.unwrap();
        ledger.record("2024-01-05").await.unwrap();
        ledger.record("2024-02-10").await.unwrap();

        let contents = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(contents, "2024-01-05\n2024-01-05\n2024-02-10\n");
        assert!(ledger.is_recorded("2024-01-05").await.unwrap());
    }

    #[tokio::test]
    async fn test_lookup_matches_whole_lines_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded_dates.log");
        std::fs::write(&path, "2024-01-05\r\n2024-02-1\n").unwrap();
        let ledger = Ledger::new(&path);

        assert!(ledger.is_recorded("2024-01-05").await.unwrap());
        assert!(!ledger.is_recorded("2024-02-10").await.unwrap());
        assert!(!ledger.is_recorded("2024-01").await.unwrap());
    }

    #[tokio::test]
    async fn test_record_after_unterminated_last_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded_dates.log");
        std::fs::write(&path, "2024-01-05").unwrap();
        let ledger = Ledger::new(&path);

        ledger.record("2024-02-10").await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "2024-01-05\n2024-02-10\n");
        assert!(ledger.is_recorded("2024-01-05").await.unwrap());
        assert!(ledger.is_recorded("2024-02-10").await.unwrap());
    }

    #[tokio::test]
    async fn test_record_after_crlf_line_adds_no_blank_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("downloaded_dates.log");
        std::fs::write(&path, "2024-01-05\r\n").unwrap();
        let ledger = Ledger::new(&path);

        ledger.record("2024-02-10").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "2024-01-05\r\n2024-02-10\n"
        );
    }

    #[tokio::test]
    async fn test_record_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("state").join("dates.log"));

        ledger.record("2024-01-05").await.unwrap();
        assert!(ledger.is_recorded("2024-01-05").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_ledger_is_an_error() {
        let dir = tempdir().unwrap();
        // A directory where the ledger file should be
        let ledger = Ledger::new(dir.path());

        match ledger.is_recorded("2024-01-05").await {
            Err(Error::LedgerIo { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("Expected LedgerIo error, got {other:?}"),
        }
        assert!(matches!(
            ledger.record("2024-01-05").await,
            Err(Error::LedgerIo { .. })
        ));
    }
}
