// src/extract/subdomains.rs
// =============================================================================
// Finds hostnames under the target domain anywhere in a response body.
//
// This is plain text matching, not HTML parsing: hostnames show up in
// scripts, JSON blobs, comments and CSP headers copied into pages, and we
// want all of them.
//
// Example (domain = "example.com"):
//   "fetch('https://API.example.com/v1')" -> ["api.example.com"]
// =============================================================================

use super::patterns;
use regex::Regex;

// The subdomain regex depends on the domain, so it is compiled once per crawl
#[derive(Debug, Clone)]
pub struct SubdomainScanner {
    pattern: Regex,
}

impl SubdomainScanner {
    pub fn new(domain: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&patterns::subdomain(domain))?,
        })
    }

    /// All distinct subdomains in `text`, lowercased, in order of appearance
    pub fn scan(&self, text: &str) -> Vec<String> {
        let found = self
            .pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim_start_matches(['.', '-', '_']).to_lowercase())
            .collect();
        super::unique(found)
    }
}
