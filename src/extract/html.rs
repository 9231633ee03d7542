// src/extract/html.rs
// =============================================================================
// This module pulls crawlable references out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Never fails: broken HTML is repaired the way a browser would
//
// For one page we collect:
// - every href attribute (on ANY element: <a>, <link>, <area>, ...)
// - every form action
// - every src attribute (scripts, iframes, data files)
// - whether the page has a file-upload input
//
// The values are returned RAW. Resolving them against the page URL is the
// job of scope::normalize, so this module knows nothing about URLs.
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

// Selectors are constants, so they are parsed once and reused
static HREF: Lazy<Selector> = Lazy::new(|| Selector::parse("[href]").expect("valid selector"));
static FORM_ACTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("form[action]").expect("valid selector"));
static SRC: Lazy<Selector> = Lazy::new(|| Selector::parse("[src]").expect("valid selector"));
static FILE_INPUT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"input[type="file"]"#).expect("valid selector"));

/// Everything one HTML document points at
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageDiscovery {
    pub hrefs: Vec<String>,
    pub form_actions: Vec<String>,
    pub srcs: Vec<String>,
    pub has_upload_input: bool,
}

// Parses `html` and collects attribute values in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a><script src='app.js'></script>"
//   result.hrefs = ["/docs"], result.srcs = ["app.js"]
pub fn discover(html: &str) -> PageDiscovery {
    let document = Html::parse_document(html);

    let attrs = |selector: &Selector, name: &str| -> Vec<String> {
        document
            .select(selector)
            .filter_map(|element| element.value().attr(name))
            .map(|value| value.to_string())
            .collect()
    };

    PageDiscovery {
        hrefs: attrs(&HREF, "href"),
        form_actions: attrs(&FORM_ACTION, "action"),
        srcs: attrs(&SRC, "src"),
        has_upload_input: document.select(&FILE_INPUT).next().is_some(),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Lazy?
//    - once_cell::sync::Lazy runs the closure the first time the value is used
//    - after that every use gets the same, already-built Selector
//    - it is thread-safe, so concurrent crawl tasks can share it
//
// 2. Why is Html not kept around?
//    - scraper's Html is not Send: it cannot cross an .await in a tokio task
//    - we parse, copy the strings we need into PageDiscovery, and drop it
// -----------------------------------------------------------------------------
