use std::net::Ipv6Addr;
use url::{Host, Url};

/// Extracts the registrable root domain of a URL string
///
/// The root domain is the domain name plus its public suffix, so subdomains
/// collapse onto the site they belong to. This is the scope boundary of a
/// crawl: a link is followed only if its root domain equals the seed's.
///
/// Unparseable URLs, URLs without a host and non-HTTP(S) URLs map to the
/// empty string, which never equals a seed's root domain.
///
/// # Examples
///
/// ```
/// use product_scout::url::root_domain;
///
/// assert_eq!(root_domain("https://www.amazon.in/x"), "amazon.in");
/// assert_eq!(root_domain("https://shop.example.co.uk/"), "example.co.uk");
/// assert_eq!(root_domain("not a url"), "");
/// ```
pub fn root_domain(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => root_domain_of(&parsed),
        Err(_) => String::new(),
    }
}

/// Same as [`root_domain`] for an already parsed URL
///
/// IP address hosts are their own root domain. A host with no registrable
/// part (e.g. `localhost`) is returned whole.
pub fn root_domain_of(url: &Url) -> String {
    if url.scheme() != "http" && url.scheme() != "https" {
        return String::new();
    }

    match url.host() {
        Some(Host::Domain(host)) => registrable_domain(host),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => String::new(),
    }
}

fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        return host;
    }

    match psl::domain_str(&host) {
        Some(domain) => domain.to_string(),
        None => host,
    }
}

/// Builds the entry URL for a seed domain: `https://{domain}/`
///
/// IPv6 addresses are bracketed.
pub fn seed_url(domain: &str) -> Result<Url, url::ParseError> {
    match domain.parse::<Ipv6Addr>() {
        Ok(addr) => Url::parse(&format!("https://[{}]", addr)),
        Err(_) => Url::parse(&format!("https://{}", domain)),
    }
}
