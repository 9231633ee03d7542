// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr) before anything can fail
// 3. Turn the flags into a CrawlConfig and open the output sink
// 4. Crawl until the frontier is empty
// 5. Exit with proper code (0 = crawl finished, 1 = configuration error)
//
// Findings are printed as they are discovered, so there is nothing left to
// print at the end; the summary only goes to the log.
//
// Rust concepts used:
// - async/await: the crawl runs many requests concurrently on tokio
// - Result<T, E> and ?: every setup step can fail and stops the program
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - validated crawl settings
mod crawl;         // src/crawl/ - frontier, fetcher, dispatcher
mod dedup;         // src/dedup.rs - "seen already?" sets
mod extract;       // src/extract/ - HTML, script and body scanners
mod output;        // src/output/ - artifact lines, stdout and file
mod scope;         // src/scope/ - URL normalization and scope checks
mod telemetry;     // src/telemetry.rs - tracing setup

use clap::Parser;
use cli::Cli;
use config::CrawlConfig;
use crawl::Crawler;
use output::ConsoleSink;
use std::sync::Arc;

use anyhow::Result;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole cause chain on one line
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.debug, cli.verbose);

    let config = CrawlConfig::from_cli(&cli)?;
    let sink = Arc::new(ConsoleSink::new(config.output_file().as_deref())?);

    let stats = Crawler::new(&config, sink)?.run().await;
    tracing::debug!(
        "{} urls, {} scripts, {} forms, {} subdomains, {} buckets",
        stats.urls,
        stats.scripts,
        stats.forms,
        stats.subdomains,
        stats.buckets
    );

    Ok(())
}
