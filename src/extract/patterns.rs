// src/extract/patterns.rs
// Regex sources used by the scanners. Extend these lists to teach the
// scanners new shapes; the scanning code does not change.

/// Quoted strings in JavaScript that look like URLs or endpoint paths.
/// Group 1 is the link without its quotes. Alternatives, in order:
/// scheme or "//" URLs, "/", "./" and "../" paths, relative paths with a
/// file extension, relative paths with at least two segments, bare file
/// names with a server-side or data extension.
pub const LINKFINDER: &str = r#"(?:"|')(((?:[a-zA-Z]{1,10}://|//)[^"'/]{1,}\.[a-zA-Z]{2,}[^"']{0,})|((?:/|\.\./|\./)[^"'><,;| *()(%%$^/\\\[\]][^"'><,;|()]{1,})|([a-zA-Z0-9_\-/]{1,}/[a-zA-Z0-9_\-/]{1,}\.(?:[a-zA-Z]{1,4}|action)(?:[\?|#][^"|']{0,}|))|([a-zA-Z0-9_\-/]{1,}/[a-zA-Z0-9_\-/]{3,}(?:[\?|#][^"|']{0,}|))|([a-zA-Z0-9_\-]{1,}\.(?:php|asp|aspx|jsp|json|action|html|js|txt|xml)(?:[\?|#][^"|']{0,}|)))(?:"|')"#;

/// Amazon S3 bucket shapes: virtual-hosted, regional, path-style and s3://.
/// Joined into one alternation so overlapping shapes report the longest,
/// leftmost match only.
pub const BUCKETS: &[&str] = &[
    r"[a-zA-Z0-9\-\._]+\.s3\.amazonaws\.com",
    r"[a-zA-Z0-9\-\._]+\.s3[\.\-][a-z0-9\-]+\.amazonaws\.com",
    r"s3[\.\-](?:[a-z0-9\-]+\.)?amazonaws\.com/[a-zA-Z0-9\-\._]+",
    r"s3://[a-zA-Z0-9\-\._]+",
];

/// Hostname labels in front of the (escaped) target domain. Group 1 is the
/// hostname; the domain must not run on into another label character, so
/// "example.com" does not match inside "example.company".
pub fn subdomain(domain: &str) -> String {
    format!(
        r"(?i)((?:[a-z0-9](?:[a-z0-9_\-]{{0,61}}[a-z0-9])?\.)+{})(?:[^a-z0-9_\-]|$)",
        regex::escape(domain)
    )
}

pub fn buckets() -> String {
    BUCKETS.join("|")
}
