use crate::inference::RoomSchema;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Hotel-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl budget, pacing and content bounds
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of distinct pages fetched per crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Pause after every visited page (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Wait before the single retry of a rate-limited request (milliseconds)
    #[serde(
        rename = "rate-limit-cooldown-ms",
        default = "default_rate_limit_cooldown_ms"
    )]
    pub rate_limit_cooldown_ms: u64,

    /// Navigation links kept per normalized page
    #[serde(rename = "max-nav-links", default = "default_max_nav_links")]
    pub max_nav_links: usize,

    /// Character ceiling of the normalized page text
    #[serde(rename = "max-content-chars", default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Per-request timeout for page fetches (seconds)
    #[serde(
        rename = "request-timeout-secs",
        default = "default_request_timeout_secs"
    )]
    pub request_timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_millis(self.rate_limit_cooldown_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_delay_ms: default_request_delay_ms(),
            rate_limit_cooldown_ms: default_rate_limit_cooldown_ms(),
            max_nav_links: default_max_nav_links(),
            max_content_chars: default_max_content_chars(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version`, followed by `(+url; email)` when contact details exist.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            contact_email: None,
        }
    }
}

/// Settings for the classification and structuring service
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Messages API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(rename = "max-tokens", default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: f32,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Column schema requested from the structurer
    #[serde(default)]
    pub schema: RoomSchema,

    /// Per-request timeout for inference calls (seconds)
    #[serde(rename = "timeout-secs", default = "default_inference_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            api_key_env: default_api_key_env(),
            schema: RoomSchema::default(),
            timeout_secs: default_inference_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving exported CSV files
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_max_pages() -> usize {
    10
}

fn default_request_delay_ms() -> u64 {
    1_000
}

fn default_rate_limit_cooldown_ms() -> u64 {
    60_000
}

fn default_max_nav_links() -> usize {
    20
}

fn default_max_content_chars() -> usize {
    15_000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_crawler_name() -> String {
    "HotelScout".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_max_tokens() -> u32 {
    1_000
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_inference_timeout_secs() -> u64 {
    60
}

fn default_output_directory() -> String {
    ".".to_string()
}
