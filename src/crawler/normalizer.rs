//! HTML normalizer producing classifier-ready page text
//!
//! This module turns raw markup into a bounded plain-text view:
//! - Non-content elements (script, style, head, frames) are dropped entirely
//! - Up to N qualifying anchors, document-wide, become navigation hints
//! - The main region's text is whitespace-collapsed
//! - The combined text is cut at a hard character ceiling

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Default number of navigation links kept per page
pub const DEFAULT_MAX_NAV_LINKS: usize = 20;

/// Default character ceiling of the normalized text
pub const DEFAULT_MAX_CHARS: usize = 15_000;

/// Elements whose text never reaches the output
const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "iframe", "frame", "frameset"];

/// Link prefixes that never count as navigation targets
const SKIPPED_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:"];

const NAVIGATION_LABEL: &str = "NAVIGATION OPTIONS:";
const CONTENT_LABEL: &str = "PAGE CONTENT:";

/// Errors raised while normalizing a page
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Page URL {url} cannot be used to resolve links: {message}")]
    InvalidBase { url: String, message: String },
}

/// A navigation candidate found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLink {
    /// Visible anchor text, whitespace-collapsed
    pub text: String,
    /// Absolute target URL
    pub url: String,
}

/// Bounded, navigation-annotated text view of one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPage {
    pub source_url: String,
    /// Qualifying anchors in document order, truncated to the link limit
    pub navigation_links: Vec<NavigationLink>,
    /// Navigation section followed by the content section, within the character ceiling
    pub text: String,
}

/// Bounds applied by [`normalize`]
#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    pub max_nav_links: usize,
    pub max_chars: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_nav_links: DEFAULT_MAX_NAV_LINKS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// Normalizes raw markup fetched from `source_url`
///
/// # Main region
///
/// The first `<main>` element wins; otherwise the first element with
/// `role="main"`; otherwise the whole document. Regions are never merged.
///
/// # Output layout
///
/// ```text
/// NAVIGATION OPTIONS:
/// <text>: <url>
/// ...
///
/// PAGE CONTENT:
/// <main region text>
/// ```
///
/// The result is truncated to `options.max_chars` characters, possibly mid-word.
///
/// # Example
///
/// ```
/// use hotel_scout::crawler::{normalize, NormalizeOptions};
///
/// let html = r#"<html><body><main><p>Deluxe   Room</p></main></body></html>"#;
/// let page = normalize(html, "https://hotel.test/", NormalizeOptions::default()).unwrap();
/// assert!(page.text.ends_with("PAGE CONTENT:\nDeluxe Room"));
/// ```
pub fn normalize(
    html: &str,
    source_url: &str,
    options: NormalizeOptions,
) -> Result<NormalizedPage, ParseError> {
    let base_url = Url::parse(source_url).map_err(|e| ParseError::InvalidBase {
        url: source_url.to_string(),
        message: e.to_string(),
    })?;

    let document = Html::parse_document(html);

    let navigation_links = extract_navigation_links(&document, &base_url, options.max_nav_links);
    let content = extract_main_text(&document);

    let mut text = String::from(NAVIGATION_LABEL);
    text.push('\n');
    let lines: Vec<String> = navigation_links
        .iter()
        .map(|link| format!("{}: {}", link.text, link.url))
        .collect();
    text.push_str(&lines.join("\n"));
    text.push_str("\n\n");
    text.push_str(CONTENT_LABEL);
    text.push('\n');
    text.push_str(&content);

    Ok(NormalizedPage {
        source_url: source_url.to_string(),
        navigation_links,
        text: truncate_chars(text, options.max_chars),
    })
}

/// Picks the main region and returns its collapsed text
fn extract_main_text(document: &Html) -> String {
    let region = ["main", "[role='main']"]
        .iter()
        .filter_map(|selector| Selector::parse(selector).ok())
        .find_map(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut pieces = Vec::new();
    collect_text(region, &mut pieces);
    collapse_whitespace(&pieces.join(" "))
}

/// Collects text nodes below `element`, skipping stripped subtrees
fn collect_text(element: ElementRef<'_>, pieces: &mut Vec<String>) {
    if is_stripped(element) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    pieces.push(trimmed.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, pieces);
                }
            }
            _ => {}
        }
    }
}

/// Visible text of an anchor, inline markup joined without separators
fn anchor_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_visible_text(element, &mut raw);
    collapse_whitespace(&raw)
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    if is_stripped(element) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_visible_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn is_stripped(element: ElementRef<'_>) -> bool {
    STRIPPED_ELEMENTS.contains(&element.value().name())
}

/// True if the element sits inside a stripped subtree
fn has_stripped_ancestor(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_stripped)
}

/// Extracts qualifying anchors from the whole document
///
/// An anchor qualifies when it has visible text, an href that is not a
/// fragment or a `javascript:`/`mailto:`/`tel:` link, and the href resolves
/// to an HTTP(S) URL against the page URL.
fn extract_navigation_links(document: &Html, base_url: &Url, limit: usize) -> Vec<NavigationLink> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| !has_stripped_ancestor(*element))
        .filter_map(|element| {
            let text = anchor_text(element);
            if text.is_empty() {
                return None;
            }
            let href = element.value().attr("href")?;
            let url = resolve_link(href, base_url)?;
            Some(NavigationLink { text, url })
        })
        .take(limit)
        .collect()
}

/// Resolves an href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - fragments and `javascript:`, `mailto:`, `tel:` links
/// - hrefs that do not resolve, or resolve to a non-HTTP(S) scheme
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if SKIPPED_PREFIXES
        .iter()
        .any(|prefix| href.to_ascii_lowercase().starts_with(prefix))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to at most `max_chars` characters
fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
    text
}
