//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that drives every page through
//! fetch → normalize → classify → (structure | enqueue), including:
//! - Owning the frontier and visited set for one crawl
//! - Enforcing the page budget and the pacing delay
//! - Turning per-page failures into dead ends instead of aborting
//! - Accumulating logs and structured fragments

use crate::config::{Config, CrawlerConfig};
use crate::crawler::frontier::Frontier;
use crate::crawler::normalizer::{normalize, NormalizeOptions, NormalizedPage};
use crate::crawler::session::{CrawlSession, PageVisit};
use crate::crawler::{HttpFetcher, PageFetcher};
use crate::inference::{
    AnthropicClient, Classification, CompletionClient, DataStructurer, LlmClassifier,
    LlmStructurer, PageClassifier,
};
use crate::state::PageOutcome;
use crate::ScoutError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Budget, pacing and normalization bounds for one crawl
#[derive(Debug, Clone, Copy)]
pub struct CrawlSettings {
    /// Maximum number of distinct pages fetched
    pub max_pages: usize,

    /// Pause after every visited page
    pub request_delay: Duration,

    pub normalize: NormalizeOptions,
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            request_delay: config.request_delay(),
            normalize: NormalizeOptions {
                max_nav_links: config.max_nav_links,
                max_chars: config.max_content_chars,
            },
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Main crawler coordinator structure
///
/// Collaborators are injected once and reused for every crawl.
pub struct Coordinator {
    settings: CrawlSettings,
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn PageClassifier>,
    structurer: Arc<dyn DataStructurer>,
    shutdown: Option<Arc<AtomicBool>>,
}

impl Coordinator {
    /// Creates a coordinator from explicit collaborators
    pub fn new(
        settings: CrawlSettings,
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn PageClassifier>,
        structurer: Arc<dyn DataStructurer>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            classifier,
            structurer,
            shutdown: None,
        }
    }

    /// Creates a coordinator wired to the HTTP fetcher and the configured inference service
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully built all collaborators
    /// * `Err(ScoutError)` - The HTTP client could not be built or the API key is missing
    pub fn from_config(config: &Config) -> Result<Self, ScoutError> {
        let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;
        let client: Arc<dyn CompletionClient> =
            Arc::new(AnthropicClient::from_env(&config.inference)?);
        let schema = config.inference.schema;

        Ok(Self::new(
            CrawlSettings::from_config(&config.crawler),
            Arc::new(fetcher),
            Arc::new(LlmClassifier::new(client.clone(), schema)),
            Arc::new(LlmStructurer::new(client, schema)),
        ))
    }

    /// Stops the crawl at the next loop iteration once `flag` is set
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Runs one crawl starting from `seed`
    ///
    /// The loop stops when the frontier drains, the page budget is spent, or
    /// the shutdown flag is raised. All three are normal completions.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Logs, fragments and per-page outcomes
    /// * `Err(ScoutError::MissingInput)` - `seed` is empty
    pub async fn run(&self, seed: &str) -> Result<CrawlSession, ScoutError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(ScoutError::MissingInput);
        }

        tracing::info!(
            "Starting crawl at {} (budget: {} pages)",
            seed,
            self.settings.max_pages
        );

        let start_time = Instant::now();
        let mut frontier = Frontier::new(seed, self.settings.max_pages);
        let mut session = CrawlSession::default();

        loop {
            if self.is_cancelled() {
                tracing::info!("Shutdown requested, stopping crawl");
                session.log("Crawl cancelled");
                break;
            }

            let Some(url) = frontier.next_url() else {
                break;
            };

            tracing::info!("Checking: {}", url);
            session.log(format!("Checking: {}", url));

            let outcome = self.process_url(&url, &mut frontier, &mut session).await;
            tracing::debug!("Finished {}: {}", url, outcome);
            session.pages.push(PageVisit { url, outcome });

            if !self.settings.request_delay.is_zero() {
                tokio::time::sleep(self.settings.request_delay).await;
            }
        }

        if frontier.budget_exhausted() && frontier.pending() > 0 {
            tracing::info!(
                "Page budget of {} reached with {} URLs still queued",
                self.settings.max_pages,
                frontier.pending()
            );
        } else {
            tracing::info!("Frontier is empty, crawl complete");
        }

        session.pending = frontier.into_pending();

        tracing::info!(
            "Crawl completed: {} pages visited, {} fragments, {} errors in {:?}",
            session.pages_visited(),
            session.fragments.len(),
            session.error_count(),
            start_time.elapsed()
        );

        Ok(session)
    }

    /// Processes a single URL
    ///
    /// This method:
    /// 1. Fetches and normalizes the page
    /// 2. Classifies it, logging the response verbatim
    /// 3. Structures the payload, or queues the candidate URLs
    ///
    /// Failures end the page as a dead end; they never abort the crawl.
    async fn process_url(
        &self,
        url: &str,
        frontier: &mut Frontier,
        session: &mut CrawlSession,
    ) -> PageOutcome {
        let page = match self.fetch_page(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                session.log(format!("Failed to fetch page content: {}", e));
                return match e {
                    ScoutError::Parse(_) => PageOutcome::ParseFailed,
                    _ => PageOutcome::FetchFailed,
                };
            }
        };

        let classification = match self.classifier.classify(&page, url).await {
            Ok(classification) => classification,
            Err(e) => {
                let error = ScoutError::Classification(e);
                tracing::warn!("{} ({})", error, url);
                session.log(error.to_string());
                return PageOutcome::ClassificationFailed;
            }
        };

        session.log(format!("Analysis: {}", classification.response_text()));

        match classification {
            Classification::Extract { payload } => {
                match self.structurer.structure(&payload).await {
                    Ok(fragment) => {
                        session.log(format!("Structured Data:\n{}", fragment.text));
                        session.fragments.push(fragment.with_source(url));
                        PageOutcome::Extracted
                    }
                    Err(e) => {
                        let error = ScoutError::Structuring(e);
                        tracing::warn!("{} ({})", error, url);
                        session.log(error.to_string());
                        PageOutcome::StructuringFailed
                    }
                }
            }
            Classification::Navigate { candidate_urls, .. } => {
                let discovered = candidate_urls.len();
                tracing::debug!("Queueing {} candidate URLs from {}", discovered, url);
                frontier.extend(candidate_urls);
                PageOutcome::Navigated { discovered }
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<NormalizedPage, ScoutError> {
        let html = self.fetcher.fetch(url).await?;
        Ok(normalize(&html, url, self.settings.normalize)?)
    }
}

/// Runs a complete crawl with collaborators built from `config`
///
/// # Example
///
/// ```no_run
/// use hotel_scout::config::Config;
/// use hotel_scout::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = run_crawl(&Config::default(), "https://hotel.example/").await?;
/// println!("{} fragments", session.fragments.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, seed: &str) -> Result<CrawlSession, ScoutError> {
    let coordinator = Coordinator::from_config(config)?;
    coordinator.run(seed).await
}
