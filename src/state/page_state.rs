/// Page outcome definitions for tracking crawl progress
///
/// Each visited page ends in exactly one of these states.
use serde::Serialize;
use std::fmt;

/// Terminal state of a visited page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum PageOutcome {
    // ===== Success States =====
    /// The classifier found listings and the structurer produced a fragment
    Extracted,

    /// The classifier pointed elsewhere; `discovered` URLs were queued
    Navigated { discovered: usize },

    // ===== Error States =====
    /// The page could not be fetched (transport error or non-success status)
    FetchFailed,

    /// The fetched markup could not be normalized
    ParseFailed,

    /// The classifier call failed outright
    ClassificationFailed,

    /// The classifier asked for extraction but the structurer call failed
    StructuringFailed,
}

impl PageOutcome {
    /// Returns true if the page contributed to the crawl (fragment or new URLs)
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Extracted | Self::Navigated { .. })
    }

    /// Returns true if this page was a dead end because of an error
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Returns true if the page produced a structured fragment
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extracted)
    }

    /// Stable snake_case name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::Navigated { .. } => "navigated",
            Self::FetchFailed => "fetch_failed",
            Self::ParseFailed => "parse_failed",
            Self::ClassificationFailed => "classification_failed",
            Self::StructuringFailed => "structuring_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigated { discovered } => {
                write!(f, "{} ({} URLs)", self.as_str(), discovered)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}
