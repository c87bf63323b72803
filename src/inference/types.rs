//! Result types crossing the classifier and structurer boundaries

use serde::Serialize;

/// Decision returned by the page classifier
///
/// The free-text response is mapped to one of these variants exactly once,
/// right after the classifier call. Nothing downstream inspects the raw text
/// again to decide what to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Classification {
    /// The page lists accommodation; `payload` is the listing description
    Extract { payload: String },

    /// The page does not list accommodation; crawl `candidate_urls` instead
    Navigate {
        response: String,
        candidate_urls: Vec<String>,
    },
}

impl Classification {
    /// Maps a free-text classifier response to a decision
    ///
    /// Any occurrence of "http" (case-insensitive) makes this a navigation
    /// result, even when listing text is present too. Candidate URLs are the
    /// whitespace-separated tokens that start with a lowercase "http".
    /// Otherwise the whole response becomes the extraction payload.
    pub fn from_response(response: impl Into<String>) -> Self {
        let response = response.into();

        if response.to_lowercase().contains("http") {
            let candidate_urls = response
                .split_whitespace()
                .filter(|token| token.starts_with("http"))
                .map(str::to_string)
                .collect();
            Self::Navigate {
                response,
                candidate_urls,
            }
        } else {
            Self::Extract { payload: response }
        }
    }

    /// The classifier's original response text
    pub fn response_text(&self) -> &str {
        match self {
            Self::Extract { payload } => payload,
            Self::Navigate { response, .. } => response,
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Navigate { .. })
    }
}

/// One chunk of CSV rows produced from a single extraction payload
///
/// The text is kept exactly as the structurer returned it; rows are only
/// parsed at export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredFragment {
    /// Page whose listing text produced this fragment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Raw delimited text
    pub text: String,
}

impl StructuredFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            source_url: None,
            text: text.into(),
        }
    }

    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
