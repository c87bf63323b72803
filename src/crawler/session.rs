//! Output of one crawl invocation

use crate::inference::StructuredFragment;
use crate::state::PageOutcome;
use serde::Serialize;

/// A visited page and how it ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVisit {
    pub url: String,
    pub outcome: PageOutcome,
}

/// Everything a crawl produced, in the order it happened
///
/// Returned to the caller at completion; partial results survive any
/// per-page failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlSession {
    /// Human-readable trace lines
    pub logs: Vec<String>,

    /// Structured fragments, one per extracted page
    pub fragments: Vec<StructuredFragment>,

    /// Visited pages in visit order
    pub pages: Vec<PageVisit>,

    /// URLs still queued when the crawl stopped
    pub pending: Vec<String>,
}

impl CrawlSession {
    pub(crate) fn log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    pub fn pages_visited(&self) -> usize {
        self.pages.len()
    }

    pub fn visited_urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.url.as_str())
    }

    pub fn error_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|page| page.outcome.is_error())
            .count()
    }

    /// All fragment texts joined line by line, as accepted by the exporter
    pub fn aggregate_text(&self) -> String {
        self.fragments
            .iter()
            .map(StructuredFragment::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
