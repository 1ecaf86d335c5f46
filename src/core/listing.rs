//! Directory-listing parser
//!
//! Turns the rows of a listing table into `(link, date)` candidates. The link
//! comes from the anchor in the second cell, the date from the text of the
//! third. Rows that don't fit that shape are skipped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use scraper::{ElementRef, Html};

/// Timestamp layouts seen on Apache, nginx, IIS and hand-made listings.
/// Day-first numeric layouts come before the month-first ones.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// A file reference found in the listing, not yet selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Link target as written in the listing (usually relative)
    pub link: String,

    /// Publication date, truncated to the day
    pub date: NaiveDate,
}

/// Parser for tabular directory listings
#[derive(Debug, Clone, Default)]
pub struct ListingParser {
    extra_formats: Vec<String>,
}

impl ListingParser {
    /// Create a parser using only the built-in date layouts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that tries `formats` before the built-in layouts
    pub fn with_formats(formats: Vec<String>) -> Self {
        Self {
            extra_formats: formats,
        }
    }

    /// Parse every usable row of the listing, in document order
    pub fn parse(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let mut candidates = Vec::new();

        let rows = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "tr");

        for row in rows {
            let cells: Vec<ElementRef> = child_elements(row, "td").collect();

            let Some(link) = cells
                .get(1)
                .and_then(|cell| child_elements(*cell, "a").next())
                .and_then(|anchor| anchor.value().attr("href"))
            else {
                continue;
            };
            let Some(date_cell) = cells.get(2) else {
                continue;
            };

            let date_text = date_cell.text().collect::<String>();
            match self.parse_date(&date_text) {
                Some(date) => candidates.push(Candidate {
                    link: link.to_string(),
                    date,
                }),
                None => debug!("Skipping {link}: unparseable date '{}'", date_text.trim()),
            }
        }

        candidates
    }

    /// Parse a listing date, discarding the time of day
    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return None;
        }

        for format in &self.extra_formats {
            if let Some(date) = parse_with(&text, format) {
                return Some(date);
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(&text) {
            return Some(dt.date_naive());
        }

        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
            .map(|dt| dt.date())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
            })
    }
}

fn parse_with(text: &str, format: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(text, format)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(text, format))
        .ok()
}

/// Direct element children of `parent` with the given tag name
fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

/// Parse a listing page with the built-in date layouts
pub fn parse_listing(html: &str) -> Vec<Candidate> {
    ListingParser::new().parse(html)
}

/// Parse one listing date with the built-in layouts
pub fn parse_listing_date(text: &str) -> Option<NaiveDate> {
    ListingParser::new().parse_date(text)
}
