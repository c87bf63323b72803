//! Integration tests for the crawler
//!
//! Most tests drive the coordinator with in-memory collaborators over a
//! scripted site graph. The last few use wiremock to run the full cycle
//! against real HTTP servers for both the site and the completion API.

use async_trait::async_trait;
use hotel_scout::config::{InferenceConfig, UserAgentConfig};
use hotel_scout::crawler::{
    build_http_client, Coordinator, CrawlSettings, FetchError, HttpFetcher, NormalizedPage,
    PageFetcher,
};
use hotel_scout::export::{export_fragments, parse_rows};
use hotel_scout::inference::{
    AnthropicClient, Classification, CompletionClient, DataStructurer, InferenceError,
    LlmClassifier, LlmStructurer, PageClassifier, RoomSchema, StructuredFragment,
};
use hotel_scout::state::PageOutcome;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_HTML: &str = "<html><body><main><h1>Our rooms</h1>\
    <p>Deluxe King, 35 sqm, city view</p></main></body></html>";

/// Serves a fixed HTML body per URL and counts every fetch
struct SiteGraph {
    pages: HashMap<String, String>,
    fetches: Mutex<Vec<String>>,
}

impl SiteGraph {
    fn with_pages(urls: &[&str]) -> Arc<Self> {
        let pages = urls
            .iter()
            .map(|url| (url.to_string(), LISTING_HTML.to_string()))
            .collect();
        Arc::new(Self {
            pages,
            fetches: Mutex::new(Vec::new()),
        })
    }

    fn fetch_log(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    fn fetch_count(&self, url: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|fetched| fetched.as_str() == url)
            .count()
    }
}

#[async_trait]
impl PageFetcher for SiteGraph {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetches.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Answers with a fixed response per URL, defaulting to a listing
struct ScriptedClassifier {
    responses: HashMap<String, String>,
    default: String,
}

impl ScriptedClassifier {
    fn new(responses: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: responses
                .iter()
                .map(|(url, response)| (url.to_string(), response.to_string()))
                .collect(),
            default: "Deluxe King, 35 sqm, city view".to_string(),
        })
    }
}

#[async_trait]
impl PageClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        _page: &NormalizedPage,
        source_url: &str,
    ) -> Result<Classification, InferenceError> {
        let response = self
            .responses
            .get(source_url)
            .unwrap_or(&self.default)
            .clone();
        Ok(Classification::from_response(response))
    }
}

/// Turns every payload into a fixed number of CSV rows and counts calls
struct CountingStructurer {
    rows_per_call: usize,
    calls: Mutex<usize>,
}

impl CountingStructurer {
    fn new(rows_per_call: usize) -> Arc<Self> {
        Arc::new(Self {
            rows_per_call,
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DataStructurer for CountingStructurer {
    async fn structure(&self, _payload: &str) -> Result<StructuredFragment, InferenceError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        let rows = (0..self.rows_per_call)
            .map(|i| format!("Grand Hotel,Room {}-{},Standard,Cosy,20 sqm,N/A,Queen", *calls, i))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(StructuredFragment::new(rows))
    }
}

fn settings() -> CrawlSettings {
    CrawlSettings {
        request_delay: Duration::ZERO,
        ..CrawlSettings::default()
    }
}

fn coordinator(
    site: Arc<SiteGraph>,
    classifier: Arc<ScriptedClassifier>,
    structurer: Arc<CountingStructurer>,
) -> Coordinator {
    Coordinator::new(settings(), site, classifier, structurer)
}

#[tokio::test]
async fn test_listing_on_seed_page() {
    let site = SiteGraph::with_pages(&["http://example.com/"]);
    let structurer = CountingStructurer::new(2);
    let coordinator = coordinator(site.clone(), ScriptedClassifier::new(&[]), structurer.clone());

    let session = coordinator.run("http://example.com/").await.unwrap();

    assert_eq!(site.fetch_log(), vec!["http://example.com/".to_string()]);
    assert_eq!(structurer.calls(), 1);
    assert_eq!(session.fragments.len(), 1);
    assert!(session.pending.is_empty());
    assert_eq!(session.pages[0].outcome, PageOutcome::Extracted);
}

#[tokio::test]
async fn test_navigation_then_listing() {
    let site = SiteGraph::with_pages(&["http://example.com/", "http://example.com/rooms"]);
    let classifier = ScriptedClassifier::new(&[(
        "http://example.com/",
        "Navigate to http://example.com/rooms",
    )]);
    let structurer = CountingStructurer::new(1);
    let coordinator = coordinator(site.clone(), classifier, structurer.clone());

    let session = coordinator.run("http://example.com/").await.unwrap();

    assert_eq!(
        site.fetch_log(),
        vec![
            "http://example.com/".to_string(),
            "http://example.com/rooms".to_string()
        ]
    );
    assert_eq!(
        session.pages[0].outcome,
        PageOutcome::Navigated { discovered: 1 }
    );
    assert_eq!(session.pages[1].outcome, PageOutcome::Extracted);
    assert_eq!(structurer.calls(), 1);
    assert_eq!(
        session.fragments[0].source_url.as_deref(),
        Some("http://example.com/rooms")
    );
    assert_eq!(
        session.logs[1],
        "Analysis: Navigate to http://example.com/rooms"
    );
}

#[tokio::test]
async fn test_navigation_chain_stops_at_budget() {
    let urls: Vec<String> = (0..15)
        .map(|i| format!("http://example.com/p{}", i))
        .collect();
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let site = SiteGraph::with_pages(&url_refs);

    let responses: Vec<(String, String)> = urls
        .windows(2)
        .map(|pair| (pair[0].clone(), format!("Try {}", pair[1])))
        .collect();
    let response_refs: Vec<(&str, &str)> = responses
        .iter()
        .map(|(url, response)| (url.as_str(), response.as_str()))
        .collect();
    let structurer = CountingStructurer::new(1);
    let coordinator = coordinator(
        site.clone(),
        ScriptedClassifier::new(&response_refs),
        structurer.clone(),
    );

    let session = coordinator.run(&urls[0]).await.unwrap();

    assert_eq!(session.pages_visited(), 10);
    assert_eq!(site.fetch_log(), urls[..10].to_vec());
    assert_eq!(session.pending, vec![urls[10].clone()]);
    assert_eq!(structurer.calls(), 0);
    assert!(session.fragments.is_empty());
}

#[tokio::test]
async fn test_fan_out_stops_at_budget() {
    let seed = "http://example.com/".to_string();
    let children: Vec<String> = (1..15)
        .map(|i| format!("http://example.com/p{}", i))
        .collect();
    let mut all_urls = vec![seed.as_str()];
    all_urls.extend(children.iter().map(String::as_str));
    let site = SiteGraph::with_pages(&all_urls);

    let seed_response = children.join(" ");
    let mut responses = vec![(seed.as_str(), seed_response.as_str())];
    responses.extend(
        children
            .iter()
            .map(|url| (url.as_str(), "Nothing here, back to http://example.com/")),
    );
    let structurer = CountingStructurer::new(1);
    let coordinator = coordinator(
        site.clone(),
        ScriptedClassifier::new(&responses),
        structurer.clone(),
    );

    let session = coordinator.run(&seed).await.unwrap();

    assert_eq!(session.pages_visited(), 10);
    assert_eq!(site.fetch_log().len(), 10);
    let unvisited: HashSet<&str> = session
        .pending
        .iter()
        .map(String::as_str)
        .filter(|url| site.fetch_count(url) == 0)
        .collect();
    let expected: HashSet<&str> = children[9..].iter().map(String::as_str).collect();
    assert_eq!(unvisited, expected);
    assert_eq!(unvisited.len(), 5);
    assert_eq!(structurer.calls(), 0);
}

#[tokio::test]
async fn test_delay_follows_every_page() {
    let site = SiteGraph::with_pages(&["http://example.com/", "http://example.com/rooms"]);
    let classifier = ScriptedClassifier::new(&[(
        "http://example.com/",
        "http://example.com/gone http://example.com/rooms",
    )]);
    let delay = Duration::from_millis(20);
    let coordinator = Coordinator::new(
        CrawlSettings {
            request_delay: delay,
            ..CrawlSettings::default()
        },
        site,
        classifier,
        CountingStructurer::new(1),
    );

    let started = Instant::now();
    let session = coordinator.run("http://example.com/").await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(session.pages_visited(), 3);
    assert_eq!(session.pages[1].outcome, PageOutcome::FetchFailed);
    assert!(
        elapsed >= delay * 3,
        "expected at least {:?} of pacing, took {:?}",
        delay * 3,
        elapsed
    );
}

#[tokio::test]
async fn test_each_url_fetched_at_most_once() {
    let site = SiteGraph::with_pages(&[
        "http://example.com/",
        "http://example.com/a",
        "http://example.com/b",
    ]);
    let classifier = ScriptedClassifier::new(&[
        (
            "http://example.com/",
            "See http://example.com/a and http://example.com/a",
        ),
        (
            "http://example.com/a",
            "Back to http://example.com/ or http://example.com/b",
        ),
        (
            "http://example.com/b",
            "Loop http://example.com/a http://example.com/",
        ),
    ]);
    let coordinator = coordinator(site.clone(), classifier, CountingStructurer::new(1));

    let session = coordinator.run("http://example.com/").await.unwrap();

    for url in ["http://example.com/", "http://example.com/a", "http://example.com/b"] {
        assert_eq!(site.fetch_count(url), 1, "{} fetched more than once", url);
    }
    assert_eq!(session.pages_visited(), 3);
    assert!(session.pending.is_empty());
}

#[tokio::test]
async fn test_frontier_is_breadth_first() {
    let site = SiteGraph::with_pages(&[
        "http://example.com/",
        "http://example.com/a",
        "http://example.com/b",
        "http://example.com/a1",
        "http://example.com/b1",
    ]);
    let classifier = ScriptedClassifier::new(&[
        (
            "http://example.com/",
            "http://example.com/a http://example.com/b",
        ),
        ("http://example.com/a", "http://example.com/a1"),
        ("http://example.com/b", "http://example.com/b1"),
    ]);
    let coordinator = coordinator(site.clone(), classifier, CountingStructurer::new(1));

    let session = coordinator.run("http://example.com/").await.unwrap();

    let visited: Vec<&str> = session.visited_urls().collect();
    assert_eq!(
        visited,
        vec![
            "http://example.com/",
            "http://example.com/a",
            "http://example.com/b",
            "http://example.com/a1",
            "http://example.com/b1",
        ]
    );
    assert_eq!(session.fragments.len(), 2);
}

#[tokio::test]
async fn test_http_mention_always_navigates() {
    let site = SiteGraph::with_pages(&["http://example.com/"]);
    // Listing text plus an uppercase scheme: navigation with no usable candidates
    let classifier = ScriptedClassifier::new(&[(
        "http://example.com/",
        "Deluxe King, see HTTP://EXAMPLE.COM/MORE",
    )]);
    let structurer = CountingStructurer::new(1);
    let coordinator = coordinator(site, classifier, structurer.clone());

    let session = coordinator.run("http://example.com/").await.unwrap();

    assert_eq!(structurer.calls(), 0);
    assert_eq!(
        session.pages[0].outcome,
        PageOutcome::Navigated { discovered: 0 }
    );
    assert!(session.pending.is_empty());
}

#[tokio::test]
async fn test_missing_pages_are_dead_ends() {
    let site = SiteGraph::with_pages(&["http://example.com/", "http://example.com/rooms"]);
    let classifier = ScriptedClassifier::new(&[(
        "http://example.com/",
        "http://example.com/gone http://example.com/rooms",
    )]);
    let structurer = CountingStructurer::new(3);
    let coordinator = coordinator(site, classifier, structurer);

    let session = coordinator.run("http://example.com/").await.unwrap();

    assert_eq!(session.pages[1].outcome, PageOutcome::FetchFailed);
    assert_eq!(session.pages[2].outcome, PageOutcome::Extracted);
    assert_eq!(session.error_count(), 1);
    assert_eq!(session.fragments.len(), 1);
}

#[tokio::test]
async fn test_session_rows_survive_export() {
    let site = SiteGraph::with_pages(&[
        "http://example.com/",
        "http://example.com/rooms",
        "http://example.com/suites",
    ]);
    let classifier = ScriptedClassifier::new(&[(
        "http://example.com/",
        "http://example.com/rooms http://example.com/suites",
    )]);
    let coordinator = coordinator(site, classifier, CountingStructurer::new(3));

    let session = coordinator.run("http://example.com/").await.unwrap();
    let at = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    let export = export_fragments(&session.fragments, at).unwrap();

    assert_eq!(export.filename, "hotel_rooms_20240102_030405.csv");
    assert_eq!(export.row_count, 6);
    let rows = parse_rows(export.body_str().unwrap());
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|row| row.len() == RoomSchema::Standard.column_count()));
}

#[tokio::test]
async fn test_session_serializes_to_json() {
    let site = SiteGraph::with_pages(&["http://example.com/"]);
    let coordinator = coordinator(site, ScriptedClassifier::new(&[]), CountingStructurer::new(1));

    let session = coordinator.run("http://example.com/").await.unwrap();
    let json = serde_json::to_value(&session).unwrap();

    assert_eq!(json["pages"][0]["url"], "http://example.com/");
    assert_eq!(json["pages"][0]["outcome"]["state"], "extracted");
    assert_eq!(json["fragments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_rate_limited_page_is_retried_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&mock_server)
        .await;

    let cooldown = Duration::from_millis(50);
    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();
    let fetcher = Arc::new(HttpFetcher::new(client, cooldown));
    let structurer = CountingStructurer::new(1);
    let coordinator = Coordinator::new(
        settings(),
        fetcher,
        ScriptedClassifier::new(&[]),
        structurer.clone(),
    );

    let started = Instant::now();
    let session = coordinator
        .run(&format!("{}/rooms", base_url))
        .await
        .unwrap();

    assert!(started.elapsed() >= cooldown);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(session.pages[0].outcome, PageOutcome::Extracted);
    assert_eq!(structurer.calls(), 1);
}

#[tokio::test]
async fn test_full_crawl_against_http_services() {
    let site = MockServer::start().await;
    let api = MockServer::start().await;
    let site_url = site.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Grand</title></head><body>\
             <nav><a href=\"/rooms\">Rooms</a></nav>\
             <main><p>Welcome to the Grand Hotel</p></main></body></html>",
        ))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&site)
        .await;

    // Classification of the home page points at the rooms page
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(body_string_contains(format!("Looking at {}/\\n", site_url)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": format!("Check {}/rooms", site_url)}]
        })))
        .mount(&api)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains(format!("Looking at {}/rooms", site_url)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": "Deluxe King, 35 sqm, city view"}]
        })))
        .mount(&api)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("convert this room information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{
                "type": "text",
                "text": "Grand Hotel,Deluxe King,Deluxe,City view room,35 sqm,City,King"
            }]
        })))
        .mount(&api)
        .await;

    let inference = InferenceConfig {
        endpoint: format!("{}/v1/messages", api.uri()),
        ..InferenceConfig::default()
    };
    let client: Arc<dyn CompletionClient> =
        Arc::new(AnthropicClient::new("test-key", &inference).unwrap());
    let http = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap();

    let coordinator = Coordinator::new(
        settings(),
        Arc::new(HttpFetcher::new(http, Duration::from_millis(10))),
        Arc::new(LlmClassifier::new(client.clone(), RoomSchema::Standard)),
        Arc::new(LlmStructurer::new(client, RoomSchema::Standard)),
    );

    let session = coordinator.run(&format!("{}/", site_url)).await.unwrap();

    let outcomes: Vec<PageOutcome> = session.pages.iter().map(|page| page.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            PageOutcome::Navigated { discovered: 1 },
            PageOutcome::Extracted
        ]
    );
    assert_eq!(session.fragments.len(), 1);
    assert_eq!(
        session.fragments[0].text,
        "Grand Hotel,Deluxe King,Deluxe,City view room,35 sqm,City,King"
    );
    assert_eq!(api.received_requests().await.unwrap().len(), 3);
}
