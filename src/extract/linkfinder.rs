// src/extract/linkfinder.rs
// =============================================================================
// Finds endpoints hidden inside JavaScript.
//
// Single-page apps rarely link to their API in HTML; the paths live in the
// bundled JS as string literals: fetch("/api/v1/users"), axios.get('./me').
// We look for quoted strings with URL or path shapes (see patterns.rs).
//
// The results are raw strings, NOT resolved URLs: "/api/v1/users" stays
// relative. Resolving and scope checks happen in the crawl module.
// =============================================================================

use super::{decode_chars, patterns};
use once_cell::sync::Lazy;
use regex::Regex;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(patterns::LINKFINDER).expect("linkfinder pattern is valid"));

// Returns every distinct link-looking string literal, in order of appearance
pub fn find_links(source: &str) -> Vec<String> {
    let source = decode_chars(source);

    let found = LINK_RE
        .captures_iter(&source)
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_line_breaks(m.as_str()))
        .filter(|link| !link.is_empty())
        .collect();

    super::unique(found)
}

fn strip_line_breaks(link: &str) -> String {
    link.chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect::<String>()
        .trim()
        .to_string()
}
