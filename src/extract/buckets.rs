// src/extract/buckets.rs
// Finds Amazon S3 bucket references in any text.

use super::patterns;
use once_cell::sync::Lazy;
use regex::Regex;

static BUCKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&patterns::buckets()).expect("bucket patterns are valid"));

pub fn find_buckets(text: &str) -> Vec<String> {
    let found = BUCKET_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    super::unique(found)
}
