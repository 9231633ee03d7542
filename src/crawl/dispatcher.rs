// src/crawl/dispatcher.rs
// =============================================================================
// This module drives the crawl.
//
// How it works:
// 1. Queue the start page (depth 1)
// 2. Take jobs off the frontier channel and spawn one task per job
//    - Visit jobs wait for a per-domain slot, fetch, and handle the response
//    - Script jobs go to the resolver, outside the slot/depth bookkeeping
// 3. Every handled response may queue new jobs on the same channel
// 4. Stop when the channel is empty AND no task is still running
//
// Step 4 is safe because a task only finishes after it has sent all of its
// jobs: if nothing is running and nothing is queued, nothing ever will be.
//
// What happens to a response depends on its status:
//   2xx         -> scanned, reported as [url], links followed
//   0 (no reply), 404, 429 -> dropped silently
//   999         -> fetched one more time, then handled like any other status
//   anything else -> reported as [url] with its status code
//
// Rust concepts:
// - JoinSet: owns a group of spawned tasks and yields them as they finish
// - tokio::select!: wait on whichever of two futures is ready first
// - Arc: share the crawl context between tasks without copying it
// =============================================================================

use super::context::CrawlContext;
use super::fetch::{FetchOutcome, Fetcher};
use super::frontier::{Frontier, FrontierEntry, Job};
use super::limiter::DomainLimiter;
use super::resolver;
use crate::config::{ConfigError, CrawlConfig};
use crate::dedup::{ArtifactClass, DedupRegistry};
use crate::extract::{self, SubdomainScanner};
use crate::output::{Artifact, Reporter, Sink};
use crate::scope::{normalize, ScopeFilter};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

/// File extensions of sources the resolver mines for links
const SCRIPT_EXTENSIONS: &[&str] = &["js", "xml", "json"];

// What to do with a finished request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Succeeded,
    /// Fetch the same URL again (only ever once)
    Retry,
    Dropped,
    ReportFailure,
}

// Maps a status code to what happens next; 0 means no response at all
pub fn classify(status: u16, already_retried: bool) -> Disposition {
    match status {
        200..=299 => Disposition::Succeeded,
        0 | 404 | 429 => Disposition::Dropped,
        999 if !already_retried => Disposition::Retry,
        _ => Disposition::ReportFailure,
    }
}

/// How much the crawl found, read from the dedup registry at the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    pub urls: usize,
    pub scripts: usize,
    pub forms: usize,
    pub subdomains: usize,
    pub buckets: usize,
}

pub struct Crawler {
    ctx: Arc<CrawlContext>,
    jobs: UnboundedReceiver<Job>,
}

impl Crawler {
    // Wires up every component for one crawl; nothing is fetched yet
    pub fn new(config: &CrawlConfig, sink: Arc<dyn Sink>) -> Result<Self, ConfigError> {
        config.validate()?;

        let scope = Arc::new(ScopeFilter::new(&config.domain, config.blacklist.as_deref())?);
        let subdomains =
            SubdomainScanner::new(&config.domain).map_err(|source| ConfigError::InvalidPattern {
                pattern: config.domain.clone(),
                source,
            })?;
        let fetcher = Fetcher::new(config, Arc::clone(&scope))?;
        let registry = Arc::new(DedupRegistry::new());
        let (frontier, jobs) =
            Frontier::channel(Arc::clone(&scope), Arc::clone(&registry), config.max_depth);

        let ctx = CrawlContext {
            site: config.site.clone(),
            scope,
            subdomains,
            registry,
            reporter: Reporter::new(sink, config.json, config.site.as_str()),
            fetcher,
            limiter: DomainLimiter::new(config.concurrency, config.delay, config.random_delay),
            frontier,
        };

        Ok(Self {
            ctx: Arc::new(ctx),
            jobs,
        })
    }

    // Crawls until there is nothing left to do
    pub async fn run(self) -> CrawlStats {
        let Crawler { ctx, mut jobs } = self;

        info!("Crawling site: {}", ctx.site);
        ctx.frontier.seed(&ctx.site);

        let mut tasks = JoinSet::new();
        loop {
            while let Ok(job) = jobs.try_recv() {
                spawn_job(&ctx, job, &mut tasks);
            }
            if tasks.is_empty() {
                break;
            }

            tokio::select! {
                Some(job) = jobs.recv() => spawn_job(&ctx, job, &mut tasks),
                Some(finished) = tasks.join_next() => {
                    if let Err(e) = finished {
                        warn!("crawl task failed: {}", e);
                    }
                }
            }
        }

        let stats = CrawlStats {
            urls: ctx.registry.len(ArtifactClass::Url),
            scripts: ctx.registry.len(ArtifactClass::Script),
            forms: ctx.registry.len(ArtifactClass::Form),
            subdomains: ctx.registry.len(ArtifactClass::Subdomain),
            buckets: ctx.registry.len(ArtifactClass::Bucket),
        };
        info!("Crawl finished: {:?}", stats);
        stats
    }
}

fn spawn_job(ctx: &Arc<CrawlContext>, job: Job, tasks: &mut JoinSet<()>) {
    let ctx = Arc::clone(ctx);
    match job {
        Job::Visit(entry) => tasks.spawn(visit(ctx, entry)),
        Job::Script(url) => tasks.spawn(resolver::resolve(ctx, url)),
    };
}

// Fetches one frontier entry (retrying a 999 once) and handles the result
async fn visit(ctx: Arc<CrawlContext>, entry: FrontierEntry) {
    let host = entry.url.host_str().unwrap_or_default().to_string();
    let mut retried = false;

    loop {
        let permit = ctx.limiter.acquire(&host).await;
        let result = ctx
            .fetcher
            .fetch(entry.url.as_str(), entry.referer.as_deref())
            .await;
        permit.release().await;

        let status = match &result {
            Ok(outcome) => outcome.status,
            Err(e) => {
                debug!("Error request: {} - {}", entry.url, e);
                0
            }
        };

        match (classify(status, retried), result) {
            (Disposition::Retry, _) => {
                debug!("Retrying {} after status {}", entry.url, status);
                retried = true;
            }
            (Disposition::Succeeded, Ok(outcome)) => {
                handle_response(&ctx, &entry, &outcome);
                return;
            }
            (Disposition::ReportFailure, _) => {
                debug!("Error request: {} - Status code: {}", entry.url, status);
                ctx.report(Artifact::Url {
                    status,
                    url: entry.url.to_string(),
                });
                return;
            }
            _ => {
                debug!("Dropping {} (status {})", entry.url, status);
                return;
            }
        }
    }
}

fn handle_response(ctx: &CrawlContext, entry: &FrontierEntry, outcome: &FetchOutcome) {
    ctx.scan_body(&outcome.body);

    ctx.report(Artifact::Url {
        status: outcome.status,
        url: entry.url.to_string(),
    });

    if outcome.is_html() {
        follow_page(ctx, entry, outcome);
    }
}

// Handles everything an HTML page points at
fn follow_page(ctx: &CrawlContext, entry: &FrontierEntry, outcome: &FetchOutcome) {
    let page = extract::discover(&outcome.body);
    let base = &outcome.final_url;
    let page_url = entry.url.as_str();

    for href in &page.hrefs {
        ctx.frontier.offer(href, base, entry.depth + 1, Some(page_url));
    }

    for action in &page.form_actions {
        let Some(form) = normalize(action, base) else {
            continue;
        };
        // Forms are findings, not fetches: only the domain matters
        if ctx.scope.matches_domain(form.as_str()) {
            ctx.report_once(
                ArtifactClass::Form,
                form.as_str(),
                Artifact::Form(form.to_string()),
            );
        }
    }

    if page.has_upload_input {
        ctx.report_once(
            ArtifactClass::UploadForm,
            page_url,
            Artifact::UploadForm(page_url.to_string()),
        );
    }

    for src in &page.srcs {
        let Some(script) = normalize(src, base) else {
            continue;
        };
        if !is_script_source(&script) || !ctx.scope.in_scope(script.as_str()) {
            continue;
        }
        if ctx.report_once(
            ArtifactClass::Script,
            script.as_str(),
            Artifact::Javascript(script.to_string()),
        ) {
            ctx.frontier.submit_script(script);
        }
    }
}

// True for .js, .xml and .json paths (case-insensitive, query ignored)
fn is_script_source(url: &Url) -> bool {
    let file = url.path().rsplit('/').next().unwrap_or_default();
    match file.rsplit_once('.') {
        Some((_, ext)) => SCRIPT_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}
