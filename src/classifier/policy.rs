use crate::config::ClassifierConfig;

/// URL substrings that mark a product page, tested in order
pub const DEFAULT_URL_PATTERNS: &[&str] = &[
    "/product/",
    "/item/",
    "/p/",
    "pid=",
    "productid=",
    "/dp/",
    "/gp/product/",
    "product/",
    "categoryid=",
];

/// Visible-text phrases that mark a product page
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "add to cart",
    "buy now",
    "price",
    "in stock",
    "sku",
    "quantity",
];

/// Classification policy data
///
/// Patterns and keywords are stored lowercased; matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierPolicy {
    url_patterns: Vec<String>,
    keywords: Vec<String>,
}

impl ClassifierPolicy {
    pub fn new<P, K>(url_patterns: P, keywords: K) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            url_patterns: normalize(url_patterns),
            keywords: normalize(keywords),
        }
    }

    /// Builds the policy from config overrides, defaulting each list
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let defaults = Self::default();
        Self {
            url_patterns: config
                .url_patterns
                .as_ref()
                .map(normalize)
                .unwrap_or(defaults.url_patterns),
            keywords: config
                .keywords
                .as_ref()
                .map(normalize)
                .unwrap_or(defaults.keywords),
        }
    }

    pub fn url_patterns(&self) -> &[String] {
        &self.url_patterns
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First URL pattern contained in `url`, if any
    pub fn match_url(&self, url: &str) -> Option<&str> {
        let url = url.to_lowercase();
        self.url_patterns
            .iter()
            .find(|pattern| url.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// First keyword contained in already-lowercased `text`, if any
    pub fn match_text(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|keyword| text.contains(keyword.as_str()))
            .map(String::as_str)
    }
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_URL_PATTERNS, DEFAULT_KEYWORDS)
    }
}

fn normalize<I>(entries: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| entry.as_ref().trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}
