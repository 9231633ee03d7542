// src/dedup.rs
// =============================================================================
// The dedup registry: "have we seen this before?" for every artifact class.
//
// Every class gets its OWN concurrent set, so a busy URL set never slows
// down subdomain or bucket lookups. Keys are never compared across classes:
// "https://example.com/login" can be both a URL and a form.
//
// The only operation is check_and_mark(). DashSet::insert() checks and
// inserts under one shard lock, so when N tasks race on the same key,
// exactly one of them sees "new". Nothing is ever removed - a crawl lives
// for one process run.
// =============================================================================

use dashmap::DashSet;

/// The artifact classes that are reported at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactClass {
    Url,
    Subdomain,
    Script,
    Form,
    Bucket,
    /// Pages that contain a file-upload input
    UploadForm,
}

#[derive(Debug, Default)]
pub struct DedupRegistry {
    urls: DashSet<String>,
    subdomains: DashSet<String>,
    scripts: DashSet<String>,
    forms: DashSet<String>,
    buckets: DashSet<String>,
    upload_forms: DashSet<String>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as seen in `class`; returns true if it was ALREADY there
    pub fn check_and_mark(&self, class: ArtifactClass, key: &str) -> bool {
        if self.contains(class, key) {
            return true;
        }
        !self.set(class).insert(key.to_string())
    }

    /// Read-only membership test
    pub fn contains(&self, class: ArtifactClass, key: &str) -> bool {
        self.set(class).contains(key)
    }

    pub fn len(&self, class: ArtifactClass) -> usize {
        self.set(class).len()
    }

    fn set(&self, class: ArtifactClass) -> &DashSet<String> {
        match class {
            ArtifactClass::Url => &self.urls,
            ArtifactClass::Subdomain => &self.subdomains,
            ArtifactClass::Script => &self.scripts,
            ArtifactClass::Form => &self.forms,
            ArtifactClass::Bucket => &self.buckets,
            ArtifactClass::UploadForm => &self.upload_forms,
        }
    }
}
