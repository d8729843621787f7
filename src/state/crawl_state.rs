use crate::state::outcome::CrawlCounters;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Shared crawl state: visited URLs and product URLs per seed domain
///
/// Every worker holds a handle to the same `CrawlState`. Each operation takes
/// its lock for a single set operation and never across an `.await`.
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: Mutex<HashSet<String>>,
    products: Mutex<HashMap<String, HashSet<String>>>,
    counters: CrawlCounters,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds state from previously persisted sets
    ///
    /// Product URLs missing from `visited` are added to it so that every
    /// product URL is also a visited URL.
    pub fn from_parts<V, P, U>(visited: V, products: P) -> Self
    where
        V: IntoIterator<Item = String>,
        P: IntoIterator<Item = (String, U)>,
        U: IntoIterator<Item = String>,
    {
        let mut visited: HashSet<String> = visited.into_iter().collect();
        let mut by_domain: HashMap<String, HashSet<String>> = HashMap::new();

        for (domain, urls) in products {
            let entry = by_domain.entry(domain).or_default();
            for url in urls {
                visited.insert(url.clone());
                entry.insert(url);
            }
        }

        Self {
            visited: Mutex::new(visited),
            products: Mutex::new(by_domain),
            counters: CrawlCounters::default(),
        }
    }

    /// Marks a URL as visited
    ///
    /// Returns true if the URL was not visited before. Check and insert happen
    /// under one lock, so concurrent callers for the same URL get exactly one
    /// `true`.
    pub fn mark_visited(&self, url: &str) -> bool {
        let mut visited = lock(&self.visited);
        if visited.contains(url) {
            return false;
        }
        visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        lock(&self.visited).contains(url)
    }

    /// Ensures a domain appears in the product map even with no products
    pub fn ensure_domain(&self, domain: &str) {
        lock(&self.products).entry(domain.to_string()).or_default();
    }

    /// Records a product URL under its crawl's root domain
    ///
    /// Returns true if the URL was new for that domain.
    pub fn record_product(&self, domain: &str, url: &str) -> bool {
        debug_assert!(self.is_visited(url), "product URL must be visited first");
        lock(&self.products)
            .entry(domain.to_string())
            .or_default()
            .insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        lock(&self.visited).len()
    }

    /// Total product URLs across all domains
    pub fn product_count(&self) -> usize {
        lock(&self.products).values().map(HashSet::len).sum()
    }

    /// Sorted copy of the visited set
    pub fn visited_urls(&self) -> BTreeSet<String> {
        lock(&self.visited).iter().cloned().collect()
    }

    /// Sorted copy of the product map
    pub fn product_urls(&self) -> BTreeMap<String, BTreeSet<String>> {
        lock(&self.products)
            .iter()
            .map(|(domain, urls)| (domain.clone(), urls.iter().cloned().collect()))
            .collect()
    }

    pub fn products_for(&self, domain: &str) -> BTreeSet<String> {
        lock(&self.products)
            .get(domain)
            .map(|urls| urls.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn counters(&self) -> &CrawlCounters {
        &self.counters
    }
}

// A worker that panics never leaves a set half-updated, so a poisoned lock
// still guards valid data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_mark_visited_once() {
        let state = CrawlState::new();
        assert!(state.mark_visited("https://example.com/"));
        assert!(!state.mark_visited("https://example.com/"));
        assert!(state.is_visited("https://example.com/"));
        assert_eq!(state.visited_count(), 1);
    }

    #[test]
    fn test_concurrent_mark_visited_has_single_winner() {
        let state = Arc::new(CrawlState::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let state = Arc::clone(&state);
                thread::spawn(move || state.mark_visited("https://example.com/p/1"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
    }

    #[test]
    fn test_record_product() {
        let state = CrawlState::new();
        state.mark_visited("https://example.com/product/1");

        assert!(state.record_product("example.com", "https://example.com/product/1"));
        assert!(!state.record_product("example.com", "https://example.com/product/1"));

        assert_eq!(state.product_count(), 1);
        assert_eq!(
            state.products_for("example.com"),
            BTreeSet::from(["https://example.com/product/1".to_string()])
        );
        assert!(state.products_for("other.com").is_empty());
    }

    #[test]
    fn test_ensure_domain_lists_empty_domain() {
        let state = CrawlState::new();
        state.ensure_domain("example.com");

        let products = state.product_urls();
        assert_eq!(products.len(), 1);
        assert!(products["example.com"].is_empty());
    }

    #[test]
    fn test_from_parts_keeps_products_visited() {
        let state = CrawlState::from_parts(
            vec!["https://a.com/".to_string()],
            vec![(
                "a.com".to_string(),
                vec!["https://a.com/p/1".to_string()],
            )],
        );

        assert!(state.is_visited("https://a.com/"));
        assert!(state.is_visited("https://a.com/p/1"));
        assert_eq!(state.visited_count(), 2);
        assert_eq!(state.product_count(), 1);
    }
}
