// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine.
//
// Submodules:
// - fetch: HTTP transport (headers, user agents, proxy, timeouts)
// - limiter: per-domain concurrency and delay
// - frontier: the job channel and the normalize/scope/dedup gate in front of it
// - context: the state every crawl task shares
// - dispatcher: the main loop and page handling
// - resolver: link mining inside JavaScript files
//
// Features:
// - Concurrent fetching, bounded per domain
// - Stays inside the target domain, skips static assets and blacklisted URLs
// - Every URL, form, script, subdomain and bucket is reported once
// - Endpoints found in JavaScript are crawled too
// =============================================================================

mod context;
mod dispatcher;
mod fetch;
mod frontier;
mod limiter;
mod resolver;


pub use dispatcher::{CrawlStats, Crawler};
