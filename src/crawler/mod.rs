//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with the rate-limit retry
//! - HTML normalization into bounded, navigation-annotated text
//! - The FIFO frontier and visited set
//! - The crawl loop that dispatches pages to the classifier and structurer

mod coordinator;
mod fetcher;
mod frontier;
mod normalizer;
mod session;

pub use coordinator::{run_crawl, Coordinator, CrawlSettings};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use frontier::Frontier;
pub use normalizer::{
    normalize, NavigationLink, NormalizeOptions, NormalizedPage, ParseError, DEFAULT_MAX_CHARS,
    DEFAULT_MAX_NAV_LINKS,
};
pub use session::{CrawlSession, PageVisit};
