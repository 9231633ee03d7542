// src/crawl/context.rs
// =============================================================================
// CrawlContext is everything a crawl task needs, shared behind one Arc:
// the config-derived pieces (site, scope, scanners), the transport and
// limiter, the frontier, the dedup registry and the reporter.
//
// Page visits and script resolutions both hold a clone of the Arc, so they
// see the same registry and can never report the same artifact twice.
// =============================================================================

use super::fetch::Fetcher;
use super::frontier::Frontier;
use super::limiter::DomainLimiter;
use crate::dedup::{ArtifactClass, DedupRegistry};
use crate::extract::{self, SubdomainScanner};
use crate::output::{Artifact, Reporter};
use crate::scope::ScopeFilter;
use std::sync::Arc;
use url::Url;

pub struct CrawlContext {
    pub site: Url,
    pub scope: Arc<ScopeFilter>,
    pub subdomains: SubdomainScanner,
    pub registry: Arc<DedupRegistry>,
    pub reporter: Reporter,
    pub fetcher: Fetcher,
    pub limiter: DomainLimiter,
    pub frontier: Frontier,
}

impl CrawlContext {
    /// Reports `artifact` unless `key` was already claimed in `class`.
    /// Returns true if this call claimed it.
    pub fn report_once(&self, class: ArtifactClass, key: &str, artifact: Artifact) -> bool {
        if self.registry.check_and_mark(class, key) {
            return false;
        }
        self.reporter.report(&artifact);
        true
    }

    pub fn report(&self, artifact: Artifact) {
        self.reporter.report(&artifact);
    }

    // Runs the text scanners over a response body and reports new finds
    pub fn scan_body(&self, body: &str) {
        let text = extract::decode_chars(body);

        for subdomain in self.subdomains.scan(&text) {
            self.report_once(
                ArtifactClass::Subdomain,
                &subdomain,
                Artifact::Subdomain(subdomain.clone()),
            );
        }
        for bucket in extract::find_buckets(&text) {
            self.report_once(ArtifactClass::Bucket, &bucket, Artifact::AwsBucket(bucket.clone()));
        }
    }
}
