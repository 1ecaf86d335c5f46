//! Newest-file selection

use crate::core::listing::Candidate;
use crate::core::source::resolve_download_url;

/// Canonical ledger key layout
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// The single file picked from a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Absolute download URL
    pub url: String,

    /// Canonical `YYYY-MM-DD` date of the file
    pub date_key: String,
}

/// Picks the candidate with the latest date.
///
/// When several candidates share the latest date the first one in listing
/// order wins.
pub fn newest(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(current) if current.date >= candidate.date => Some(current),
        _ => Some(candidate),
    })
}

/// Selects the newest candidate and resolves it against the listing URL
pub fn select_newest(candidates: &[Candidate], listing_url: &str) -> Option<SelectedFile> {
    newest(candidates).map(|candidate| SelectedFile {
        url: resolve_download_url(listing_url, &candidate.link),
        date_key: candidate.date.format(DATE_KEY_FORMAT).to_string(),
    })
}
