// src/scope/filter.rs
// =============================================================================
// The scope filter: is this URL inside the crawl boundary?
//
// A URL is in scope when:
// 1. it contains the target domain (regex match anywhere in the URL), AND
// 2. it matches none of the blacklist patterns
//
// The blacklist always contains STATIC_ASSET_PATTERN (images, fonts, css)
// and optionally one user-supplied regex (--blacklist).
//
// Rust concepts:
// - regex::Regex: compiled once, matched many times
// - Cow<str>: return the input unchanged without allocating, or a new String
// =============================================================================

use crate::config::ConfigError;
use regex::Regex;
use std::borrow::Cow;

/// URLs ending in these extensions are never worth fetching
pub const STATIC_ASSET_PATTERN: &str =
    r"(?i)\.(jpg|jpeg|gif|css|tif|tiff|png|ttf|woff|woff2|ico)(?:\?|#|$)";

#[derive(Debug, Clone)]
pub struct ScopeFilter {
    domain: Regex,
    blacklist: Vec<Regex>,
}

impl ScopeFilter {
    // Builds the filter for a domain token and an optional extra blacklist
    //
    // The domain is escaped, so "example.com" does not also match "exampleXcom".
    pub fn new(domain: &str, extra_blacklist: Option<&str>) -> Result<Self, ConfigError> {
        let domain_pattern = format!("(?i){}", regex::escape(domain));
        let domain = compile(&domain_pattern)?;

        let mut blacklist = vec![compile(STATIC_ASSET_PATTERN)?];
        if let Some(pattern) = extra_blacklist {
            blacklist.push(compile(pattern)?);
        }

        Ok(Self { domain, blacklist })
    }

    /// True if the URL mentions the target domain, ignoring the blacklist
    pub fn matches_domain(&self, url: &str) -> bool {
        self.domain.is_match(url)
    }

    /// True if any blacklist pattern matches
    pub fn is_blacklisted(&self, url: &str) -> bool {
        self.blacklist.iter().any(|re| re.is_match(url))
    }

    /// Full scope check: domain match and no blacklist match
    pub fn in_scope(&self, url: &str) -> bool {
        let url = with_explicit_scheme(url);
        self.matches_domain(&url) && !self.is_blacklisted(&url)
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

// Rewrites a scheme-relative link ("//host/path") to "https://host/path"
//
// Anything else is returned as-is.
pub fn with_explicit_scheme(url: &str) -> Cow<'_, str> {
    if url.starts_with("//") {
        Cow::Owned(format!("https:{}", url))
    } else {
        Cow::Borrowed(url)
    }
}
