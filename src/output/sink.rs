// src/output/sink.rs
// =============================================================================
// Sinks receive finished output lines.
//
// ConsoleSink prints every line to stdout and, when an output file was
// configured, appends it there too. Writing is best-effort: a failed file
// write is logged and the crawl goes on.
// =============================================================================

use crate::config::ConfigError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Anything that accepts output lines; shared by all crawl tasks
pub trait Sink: Send + Sync {
    fn emit(&self, line: &str);
}

#[derive(Debug, Default)]
pub struct ConsoleSink {
    file: Option<Mutex<File>>,
}

impl ConsoleSink {
    // Opens (or creates) the output file in append mode, creating its folder
    pub fn new(output_file: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = output_file else {
            return Ok(Self::default());
        };

        let open = || -> std::io::Result<File> {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            OpenOptions::new().create(true).append(true).open(path)
        };
        let file = open().map_err(|source| ConfigError::Output {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            file: Some(Mutex::new(file)),
        })
    }
}

impl Sink for ConsoleSink {
    fn emit(&self, line: &str) {
        println!("{}", line);

        if let Some(file) = &self.file {
            let result = match file.lock() {
                Ok(mut file) => writeln!(file, "{}", line),
                Err(poisoned) => {
                    let mut file = poisoned.into_inner();
                    writeln!(file, "{}", line)
                }
            };
            if let Err(e) = result {
                tracing::warn!("failed to write output file: {}", e);
            }
        }
    }
}

// Collects lines in memory so tests can look at them
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines starting with `prefix`, e.g. "[url]"
    pub fn lines_with(&self, prefix: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with(prefix))
            .collect()
    }
}

#[cfg(test)]
impl Sink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
