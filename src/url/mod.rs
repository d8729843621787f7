//! URL handling module for Product-Scout
//!
//! This module provides root-domain extraction and the scope check that keeps
//! each crawl inside its seed domain.

mod domain;

pub use domain::{root_domain, root_domain_of, seed_url};

/// Returns true if `link` belongs to the crawl rooted at `root`
///
/// An empty `root` is never in scope, so malformed seeds cannot match
/// malformed links.
pub fn in_scope(link: &str, root: &str) -> bool {
    !root.is_empty() && root_domain(link) == root
}
