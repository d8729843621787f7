//! Product page classification
//!
//! A page is a product page if the first matching rule says so:
//! 1. URL pattern (cheap, no content needed)
//! 2. Product-type metadata tag
//! 3. Product keyword in the visible text
//!
//! There is no negative rule; a page that matches nothing is simply not
//! classified as a product.

mod policy;

pub use policy::{ClassifierPolicy, DEFAULT_KEYWORDS, DEFAULT_URL_PATTERNS};

use crate::crawler::ParsedPage;
use std::fmt;

/// The rule that classified a page as a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSignal {
    UrlPattern(String),
    Metadata,
    Keyword(String),
}

impl fmt::Display for ProductSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UrlPattern(pattern) => write!(f, "url pattern '{}'", pattern),
            Self::Metadata => f.write_str("product metadata"),
            Self::Keyword(keyword) => write!(f, "keyword '{}'", keyword),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductClassifier {
    policy: ClassifierPolicy,
}

impl ProductClassifier {
    pub fn new(policy: ClassifierPolicy) -> Self {
        Self { policy }
    }

    /// Returns the first rule that marks the page as a product
    pub fn classify(&self, url: &str, page: Option<&ParsedPage>) -> Option<ProductSignal> {
        if let Some(pattern) = self.policy.match_url(url) {
            return Some(ProductSignal::UrlPattern(pattern.to_string()));
        }

        let page = page?;

        if page.has_product_meta {
            return Some(ProductSignal::Metadata);
        }

        self.policy
            .match_text(&page.text)
            .map(|keyword| ProductSignal::Keyword(keyword.to_string()))
    }

    pub fn is_product(&self, url: &str, page: Option<&ParsedPage>) -> bool {
        self.classify(url, page).is_some()
    }
}
