//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: the terminal state of each visited page (extracted, navigated, or failed)

mod page_state;

// Re-export main types
pub use page_state::PageOutcome;
