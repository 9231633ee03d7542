// src/scope/normalize.rs
// =============================================================================
// Resolves a raw reference (href, src, form action, script string) against
// the URL of the page it was found on.
//
// Examples (base = "https://example.com/docs/page"):
//   "/api"              -> https://example.com/api
//   "../about#team"     -> https://example.com/about   (fragment dropped)
//   "//cdn.example.com" -> https://cdn.example.com/     (base scheme reused)
//   "mailto:a@b.c"      -> None (not http/https)
//   ""                  -> None
//
// Bad input never panics or errors - it just returns None, so one broken
// attribute cannot stop the crawl.
// =============================================================================

use url::Url;

pub fn normalize(raw: &str, base: &Url) -> Option<Url> {
    let raw = raw.trim();

    // Empty and pure-fragment references point back at the page itself
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    // join() also handles absolute URLs: the base is simply ignored then
    let mut url = base.join(raw).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    if url.host_str().map_or(true, str::is_empty) {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(
            normalize("/api", &base()).unwrap().as_str(),
            "https://example.com/api"
        );
        assert_eq!(
            normalize("../about#team", &base()).unwrap().as_str(),
            "https://example.com/about"
        );
        assert_eq!(
            normalize("child?x=1", &base()).unwrap().as_str(),
            "https://example.com/docs/child?x=1"
        );
    }

    #[test]
    fn test_scheme_relative_uses_base_scheme() {
        assert_eq!(
            normalize("//cdn.example.com/app.js", &base()).unwrap().as_str(),
            "https://cdn.example.com/app.js"
        );
    }

    #[test]
    fn test_absolute_url_is_idempotent() {
        for url in [
            "https://example.com/a/b?c=d",
            "http://other.test:8080/",
            "https://example.com/search?q=rust&page=2",
        ] {
            let once = normalize(url, &base()).unwrap();
            assert_eq!(once.as_str(), url);
            let twice = normalize(once.as_str(), &Url::parse("https://unrelated.test/x").unwrap())
                .unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_rejects_empty_and_non_http() {
        assert!(normalize("", &base()).is_none());
        assert!(normalize("   ", &base()).is_none());
        assert!(normalize("#top", &base()).is_none());
        assert!(normalize("mailto:test@example.com", &base()).is_none());
        assert!(normalize("javascript:void(0)", &base()).is_none());
        assert!(normalize("tel:+123", &base()).is_none());
    }

    #[test]
    fn test_malformed_input_is_not_fatal() {
        assert!(normalize("http://[::1", &base()).is_none());
        assert!(normalize("https://", &base()).is_none());
    }
}
