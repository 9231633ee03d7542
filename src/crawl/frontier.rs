// src/crawl/frontier.rs
// =============================================================================
// The frontier is the queue of work the dispatcher still has to do.
//
// Work arrives as Job messages on one unbounded channel:
// - Job::Visit   - a page to fetch, with its depth
// - Job::Script  - a script to mine for links (no depth, see resolver.rs)
//
// Every page URL - from an href, or from a link found inside a script -
// goes through the same gate before it becomes a Job:
//   normalize -> scope filter -> depth limit -> dedup claim -> send
// There is no way around the gate, so a URL is visited at most once no
// matter how many tasks find it at the same time.
// =============================================================================

use crate::dedup::{ArtifactClass, DedupRegistry};
use crate::scope::{normalize, ScopeFilter};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;
use url::Url;

/// Depth of the start page; links found in scripts re-enter at this depth
pub const ROOT_DEPTH: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: usize,
    /// The page the URL was found on, sent as the Referer header
    pub referer: Option<String>,
}

#[derive(Debug)]
pub enum Job {
    Visit(FrontierEntry),
    Script(Url),
}

#[derive(Debug, Clone)]
pub struct Frontier {
    jobs: UnboundedSender<Job>,
    scope: Arc<ScopeFilter>,
    registry: Arc<DedupRegistry>,
    max_depth: usize,
}

impl Frontier {
    // Creates the frontier and the receiving end the dispatcher drains
    pub fn channel(
        scope: Arc<ScopeFilter>,
        registry: Arc<DedupRegistry>,
        max_depth: usize,
    ) -> (Self, UnboundedReceiver<Job>) {
        let (jobs, receiver) = mpsc::unbounded_channel();
        let frontier = Self {
            jobs,
            scope,
            registry,
            max_depth,
        };
        (frontier, receiver)
    }

    /// Queues the start page. It is claimed in the URL set like any other
    /// page, so links back to it are not visited again.
    pub fn seed(&self, site: &Url) -> bool {
        if self.registry.check_and_mark(ArtifactClass::Url, site.as_str()) {
            return false;
        }
        self.send(Job::Visit(FrontierEntry {
            url: site.clone(),
            depth: ROOT_DEPTH,
            referer: None,
        }))
    }

    /// Runs `raw` through the gate; returns true if a visit was queued
    pub fn offer(&self, raw: &str, base: &Url, depth: usize, referer: Option<&str>) -> bool {
        let Some(url) = normalize(raw, base) else {
            return false;
        };
        if !self.scope.in_scope(url.as_str()) {
            return false;
        }
        // Checked before the claim, so a URL seen too deep can still be
        // visited when found again at a shallower depth
        if !self.within_depth(depth) {
            return false;
        }
        if self.registry.check_and_mark(ArtifactClass::Url, url.as_str()) {
            return false;
        }

        self.send(Job::Visit(FrontierEntry {
            url,
            depth,
            referer: referer.map(str::to_string),
        }))
    }

    /// Queues a script for the resolver
    pub fn submit_script(&self, url: Url) -> bool {
        self.send(Job::Script(url))
    }

    fn within_depth(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }

    fn send(&self, job: Job) -> bool {
        match self.jobs.send(job) {
            Ok(()) => true,
            Err(e) => {
                debug!("frontier closed, dropping {:?}", e.0);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(max_depth: usize) -> (Frontier, UnboundedReceiver<Job>) {
        let scope = Arc::new(ScopeFilter::new("example.com", None).unwrap());
        Frontier::channel(scope, Arc::new(DedupRegistry::new()), max_depth)
    }

    fn base() -> Url {
        Url::parse("https://example.com/docs/").unwrap()
    }

    fn next_visit(rx: &mut UnboundedReceiver<Job>) -> Option<FrontierEntry> {
        match rx.try_recv().ok()? {
            Job::Visit(entry) => Some(entry),
            Job::Script(_) => None,
        }
    }

    #[test]
    fn test_offer_resolves_and_queues_once() {
        let (frontier, mut rx) = frontier(3);
        assert!(frontier.offer("page#intro", &base(), 2, Some("https://example.com/docs/")));
        assert!(!frontier.offer("https://example.com/docs/page", &base(), 2, None));

        let entry = next_visit(&mut rx).unwrap();
        assert_eq!(entry.url.as_str(), "https://example.com/docs/page");
        assert_eq!(entry.depth, 2);
        assert_eq!(entry.referer.as_deref(), Some("https://example.com/docs/"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_out_of_scope_and_blacklisted_are_dropped() {
        let (frontier, mut rx) = frontier(3);
        assert!(!frontier.offer("https://other.test/", &base(), 2, None));
        assert!(!frontier.offer("/logo.png", &base(), 2, None));
        assert!(!frontier.offer("mailto:hi@example.com", &base(), 2, None));
        assert!(!frontier.offer("", &base(), 2, None));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_too_deep_is_not_claimed() {
        let (frontier, mut rx) = frontier(2);
        assert!(!frontier.offer("/deep", &base(), 3, None));
        // Found again closer to the root: now it is visited
        assert!(frontier.offer("/deep", &base(), ROOT_DEPTH, None));
        assert_eq!(next_visit(&mut rx).unwrap().depth, ROOT_DEPTH);
    }

    #[test]
    fn test_zero_depth_is_unlimited() {
        let (frontier, _rx) = frontier(0);
        assert!(frontier.offer("/very/deep", &base(), 1_000, None));
    }

    #[test]
    fn test_seed_claims_the_root() {
        let (frontier, mut rx) = frontier(2);
        let site = Url::parse("https://example.com/").unwrap();
        assert!(frontier.seed(&site));
        assert!(!frontier.offer("/", &site, 2, None));
        assert_eq!(next_visit(&mut rx).unwrap().url, site);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_frontier() {
        let (frontier, rx) = frontier(2);
        drop(rx);
        assert!(!frontier.offer("/a", &base(), 1, None));
        assert!(!frontier.submit_script(base()));
    }
}
