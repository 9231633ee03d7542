// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below IS the CLI definition, and every
// field becomes a flag. The values are only parsed here - turning them into a
// validated crawl configuration happens in config.rs.
//
// Rust concepts:
// - Structs: group all the flags into one value
// - Derive macros: generate the parsing code for us
// - Option<T>: flags that may or may not be given
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "scope-spider",
    version = "0.1.0",
    about = "A scope-limited web spider that maps links, forms, scripts, subdomains and S3 buckets",
    long_about = "scope-spider crawls a single site, stays inside its domain, and reports every \
                  URL, form, upload form, JavaScript file, subdomain and S3 bucket it finds. \
                  JavaScript files are also mined for endpoint paths, which are crawled too."
)]
pub struct Cli {
    /// Site to crawl (e.g., https://example.com)
    #[arg(short = 's', long)]
    pub site: String,

    /// Maximum crawl depth. 1 = only the start page, 0 = unlimited
    #[arg(short = 'd', long, default_value_t = 1)]
    pub depth: usize,

    /// Maximum number of concurrent requests per domain
    #[arg(short = 'c', long, default_value_t = 5)]
    pub concurrent: usize,

    /// Delay in seconds between two requests to the same domain
    #[arg(short = 'k', long, default_value_t = 0)]
    pub delay: u64,

    /// Extra random delay in seconds added on top of --delay
    #[arg(short = 'K', long, default_value_t = 0)]
    pub random_delay: u64,

    /// Request timeout in seconds
    #[arg(short = 'm', long, default_value_t = 10)]
    pub timeout: u64,

    /// Proxy URL (e.g., http://127.0.0.1:8080)
    #[arg(short = 'p', long)]
    pub proxy: Option<String>,

    /// Cookie header sent with every request (e.g., "session=abc; lang=en")
    #[arg(long)]
    pub cookie: Option<String>,

    /// Extra header sent with every request, repeatable (e.g., -H "Authorization: Bearer x")
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Raw HTTP request file (e.g. saved from Burp) to take headers and cookie from
    #[arg(long)]
    pub burp: Option<PathBuf>,

    /// Extra regex of URLs that must never be crawled
    #[arg(long)]
    pub blacklist: Option<String>,

    /// Do not follow redirects
    #[arg(long)]
    pub no_redirect: bool,

    /// User-Agent: "web" (random desktop), "mobi" (random mobile) or a literal value
    #[arg(short = 'u', long, default_value = "web")]
    pub user_agent: String,

    /// Folder to also write the results to
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Print one JSON object per result instead of plain lines
    #[arg(long)]
    pub json: bool,

    /// Log debug information to stderr
    #[arg(long)]
    pub debug: bool,

    /// Log progress information to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. short = 'K' vs short = 'k'
//    - clap derives a short flag from the first letter by default
//    - delay and random_delay would both want -r/-d, so we name them ourselves
//
// 2. Vec<String> for --header
//    - clap collects every occurrence of a repeated flag into the Vec
//    - no occurrence = empty Vec, so there is no Option needed
//
// 3. PathBuf instead of String for files
//    - PathBuf is the owned type for filesystem paths
//    - it handles non-UTF-8 paths that String could not hold
// -----------------------------------------------------------------------------
