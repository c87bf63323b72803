//! Frontier queue and visited set for one crawl
//!
//! This module handles:
//! - FIFO ordering of pending URLs (breadth-first expansion)
//! - Suppressing URLs already visited, at dequeue time
//! - Enforcing the page budget

use std::collections::{HashSet, VecDeque};

/// Pending URLs plus the set of URLs already handed out
///
/// Duplicates may be pushed freely; a URL is returned by [`Frontier::next_url`]
/// at most once. Only URLs actually returned count against the page budget.
#[derive(Debug)]
pub struct Frontier {
    /// URLs waiting to be visited, in insertion order
    queue: VecDeque<String>,

    /// URLs already returned by `next_url`; only ever grows
    visited: HashSet<String>,

    /// Maximum number of distinct URLs handed out
    max_pages: usize,
}

impl Frontier {
    /// Creates a frontier seeded with exactly one URL
    pub fn new(seed: impl Into<String>, max_pages: usize) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(seed.into());

        Self {
            queue,
            visited: HashSet::new(),
            max_pages,
        }
    }

    /// Gets the next URL to visit
    ///
    /// Each call:
    /// 1. Returns None once the budget is spent or the queue is empty
    /// 2. Pops the head of the queue
    /// 3. Discards it and tries again if it was already visited
    /// 4. Marks it visited and returns it
    pub fn next_url(&mut self) -> Option<String> {
        loop {
            if self.budget_exhausted() {
                return None;
            }

            let url = self.queue.pop_front()?;

            if self.visited.contains(&url) {
                tracing::trace!("Skipping already visited URL: {}", url);
                continue;
            }

            self.visited.insert(url.clone());
            return Some(url);
        }
    }

    /// Appends URLs to the tail of the queue, keeping their order
    pub fn extend<I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.queue.extend(urls);
    }

    pub fn budget_exhausted(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs still queued (duplicates included)
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Consumes the frontier, returning the URLs never dequeued
    pub fn into_pending(self) -> Vec<String> {
        self.queue.into_iter().collect()
    }
}
