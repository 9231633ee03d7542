// src/output/mod.rs
// =============================================================================
// This module is where discovered artifacts leave the program.
//
// Submodules:
// - artifact: the Artifact enum and its one-line text format
// - sink: where lines go (stdout, plus an optional file)
//
// Reporter sits between the two and picks plain text or JSON.
// =============================================================================

mod artifact;
mod sink;

pub use artifact::Artifact;
pub use sink::{ConsoleSink, Sink};

#[cfg(test)]
pub use sink::MemorySink;

use serde::Serialize;
use std::sync::Arc;

// One JSON line per artifact (--json)
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    input: &'a str,
    source: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    output: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

// Formats artifacts and hands the lines to a sink
#[derive(Clone)]
pub struct Reporter {
    sink: Arc<dyn Sink>,
    json: bool,
    input: String,
}

impl Reporter {
    // `input` is the crawled site, repeated in every JSON record
    pub fn new(sink: Arc<dyn Sink>, json: bool, input: impl Into<String>) -> Self {
        Self {
            sink,
            json,
            input: input.into(),
        }
    }

    pub fn report(&self, artifact: &Artifact) {
        if !self.json {
            self.sink.emit(&artifact.to_string());
            return;
        }

        let record = JsonRecord {
            input: &self.input,
            source: artifact.source().unwrap_or("body"),
            kind: artifact.kind(),
            output: artifact.value(),
            status: artifact.status(),
        };
        match serde_json::to_string(&record) {
            Ok(line) => self.sink.emit(&line),
            Err(e) => tracing::warn!("failed to serialize {}: {}", artifact, e),
        }
    }
}
