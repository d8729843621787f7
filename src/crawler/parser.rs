//! HTML parser for extracting links and classification signals
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from <a> tags)
//! - Product-type metadata (`og:type` / `product` meta tags)
//! - The lowercased visible text used by keyword heuristics
//! - Page title

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// All distinct links found on the page (absolute URLs, document order)
    pub links: Vec<String>,

    /// Whether a product-type metadata tag is present
    pub has_product_meta: bool,

    /// Visible text, lowercased
    pub text: String,
}

/// Parses HTML content and extracts links, metadata and text
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that is not HTTP(S) after resolution
///
/// # Example
///
/// ```
/// use product_scout::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Buy now</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// assert!(parsed.text.contains("buy now"));
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
        has_product_meta: has_product_metadata(&document),
        text: extract_visible_text(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    if seen.insert(absolute_url.clone()) {
                        links.push(absolute_url);
                    }
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Detects product-type metadata
///
/// Matches `<meta name|property="og:type" content="product">` (also
/// `product.*` subtypes) and any `<meta property="product">`.
fn has_product_metadata(document: &Html) -> bool {
    let Ok(meta_selector) = Selector::parse("meta") else {
        return false;
    };

    document.select(&meta_selector).any(|meta| {
        let element = meta.value();

        let declares_og_type = [element.attr("name"), element.attr("property")]
            .into_iter()
            .flatten()
            .any(|key| key.trim().eq_ignore_ascii_case("og:type"));

        if declares_og_type && element.attr("content").is_some_and(is_product_type) {
            return true;
        }

        element
            .attr("property")
            .is_some_and(|property| property.trim().eq_ignore_ascii_case("product"))
    })
}

fn is_product_type(content: &str) -> bool {
    let content = content.trim().to_ascii_lowercase();
    content == "product" || content.starts_with("product.")
}

/// Collects text outside script/style elements, lowercased
fn extract_visible_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(fragment);
    }

    text.to_lowercase()
}
