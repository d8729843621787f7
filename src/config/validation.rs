use crate::config::types::{ClassifierConfig, Config, CrawlerConfig, DomainEntry, HttpConfig};
use crate::ConfigError;
use std::net::IpAddr;
use url::Url;

const MAX_WORKERS: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_checkpoint_path(&config.checkpoint.path)?;
    validate_classifier_config(&config.classifier)?;
    validate_domains(&config.domains)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.max_workers
        )));
    }

    if config.idle_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "idle_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates request header values
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("user-agent", &config.user_agent),
        ("referer", &config.referer),
        ("accept", &config.accept),
        ("accept-language", &config.accept_language),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(ConfigError::Validation(format!(
                "{} must not contain control characters",
                name
            )));
        }
    }

    Ok(())
}

fn validate_checkpoint_path(path: &str) -> Result<(), ConfigError> {
    if path.is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates classifier overrides; absent lists fall back to defaults
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    for (name, list) in [
        ("url-patterns", &config.url_patterns),
        ("keywords", &config.keywords),
    ] {
        if let Some(entries) = list {
            if entries.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "classifier {} cannot be an empty list",
                    name
                )));
            }
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "classifier {} cannot contain empty entries",
                    name
                )));
            }
        }
    }
    Ok(())
}

/// Validates the seed domain list
fn validate_domains(domains: &[DomainEntry]) -> Result<(), ConfigError> {
    if domains.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[domain]] entry is required".to_string(),
        ));
    }

    for entry in domains {
        validate_domain_name(&entry.name)?;

        entry.seed_url().map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Domain '{}' has no usable seed URL: {}",
                entry.name, e
            ))
        })?;

        if let Some(seed) = &entry.seed {
            let url = Url::parse(seed).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e))
            })?;

            if url.scheme() != "https" && url.scheme() != "http" {
                return Err(ConfigError::Validation(format!(
                    "Seed URL '{}' must use HTTP or HTTPS",
                    seed
                )));
            }
        }
    }

    Ok(())
}

/// Validates a domain name; IP addresses are accepted as-is
fn validate_domain_name(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if domain.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
