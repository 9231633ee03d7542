// src/extract/mod.rs
// =============================================================================
// This module finds things in response bodies.
//
// Submodules:
// - html: pulls href / form action / src values and upload inputs out of HTML
// - subdomains: hostnames under the target domain, anywhere in the text
// - buckets: Amazon S3 bucket hostnames and paths
// - linkfinder: endpoint paths and URLs inside JavaScript string literals
// - patterns: the regex sources the scanners are built from
//
// Every scanner is a plain function of the text: no network, no state, and
// no way to fail - no match simply means an empty Vec.
// =============================================================================

mod buckets;
mod html;
mod linkfinder;
mod patterns;
mod subdomains;

pub use buckets::find_buckets;
pub use html::discover;
pub use linkfinder::find_links;
pub use subdomains::SubdomainScanner;

// Undoes the encodings that hide URLs from the scanners
//
// Percent-encoding is decoded when the result is valid UTF-8, then the JSON
// escapes for "/" and "&" are replaced.
pub fn decode_chars(text: &str) -> String {
    let decoded = match urlencoding::decode(text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_string(),
    };

    decoded
        .replace("\\u002f", "/")
        .replace("\\u002F", "/")
        .replace("\\u0026", "&")
        .replace("\\/", "/")
}

// Keeps the first occurrence of every value, in order
pub(crate) fn unique(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
