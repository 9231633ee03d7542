// src/crawl/resolver.rs
// =============================================================================
// The script link resolver: mines one JavaScript / JSON / XML file for links.
//
// How it works:
// 1. If the script is minified ("app.min.js"), queue the presumed original
//    ("app.js") as a second, independent script. Nobody checks that it
//    exists first - a 404 simply ends that job.
// 2. Fetch the script once. Any error or non-200 status ends this job
//    silently; scripts are never retried.
// 3. Run the subdomain and S3 scanners over the body.
// 4. Run the linkfinder and keep links that are inside the crawl domain
//    (relative paths are kept as they are).
// 5. Report each kept link and offer it to the frontier at the ROOT depth.
//
// Scripts are fetched outside the per-domain limiter and do not count
// towards crawl depth. Their links still pass through the same frontier
// gate as every other URL, so they are deduplicated all the same.
// =============================================================================

use super::context::CrawlContext;
use super::frontier::ROOT_DEPTH;
use crate::extract;
use crate::output::Artifact;
use crate::scope::{with_explicit_scheme, ScopeFilter};
use std::sync::Arc;
use tracing::debug;
use url::Url;

const MINIFIED_MARKER: &str = ".min.js";

pub async fn resolve(ctx: Arc<CrawlContext>, script: Url) {
    if let Some(original) = deminified_sibling(&script) {
        ctx.frontier.submit_script(original);
    }

    let outcome = match ctx.fetcher.fetch(script.as_str(), None).await {
        Ok(outcome) if outcome.status == 200 => outcome,
        Ok(outcome) => {
            debug!("script {} answered {}", script, outcome.status);
            return;
        }
        Err(e) => {
            debug!("script {} failed: {}", script, e);
            return;
        }
    };

    ctx.scan_body(&outcome.body);

    for link in extract::find_links(&outcome.body) {
        let Some(link) = scoped_link(&ctx.scope, &link) else {
            continue;
        };

        ctx.report(Artifact::LinkFinder {
            from: script.to_string(),
            link: link.clone(),
        });
        ctx.frontier
            .offer(&link, &ctx.site, ROOT_DEPTH, Some(script.as_str()));
    }
}

// "https://x.test/app.min.js" -> "https://x.test/app.js"
//
// A blind substitution: the derived URL may well not exist.
pub fn deminified_sibling(script: &Url) -> Option<Url> {
    let raw = script.as_str();
    if !raw.contains(MINIFIED_MARKER) {
        return None;
    }
    Url::parse(&raw.replace(MINIFIED_MARKER, ".js")).ok()
}

// Decides whether a linkfinder result is kept, and in which form
//
// - absolute URLs must mention the crawl domain
// - "//host/path" becomes "https://host/path" and must mention it too
// - anything else is a relative path on the crawled site and is kept
fn scoped_link(scope: &ScopeFilter, link: &str) -> Option<String> {
    if Url::parse(link).is_ok() {
        return scope.matches_domain(link).then(|| link.to_string());
    }
    if link.starts_with("//") {
        let link = with_explicit_scheme(link).into_owned();
        return scope.matches_domain(&link).then_some(link);
    }
    Some(link.to_string())
}
