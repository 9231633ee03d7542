// src/output/artifact.rs
// =============================================================================
// An Artifact is one finding of the crawl. Once built it is only formatted
// and emitted, never changed.
//
// The text format of each variant is stable - other tools grep for it:
//   [url] - [code-200] - https://example.com/
//   [form] - https://example.com/login
//   [upload-form] - https://example.com/profile
//   [javascript] - https://example.com/app.js
//   [subdomains] - api.example.com
//   [aws-s3] - bucket.s3.amazonaws.com
//   [linkfinder] - [from: https://example.com/app.js] - /api/v1/users
// =============================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A visited URL and the status it answered with
    Url { status: u16, url: String },
    Form(String),
    /// A page containing a file-upload input
    UploadForm(String),
    Javascript(String),
    Subdomain(String),
    AwsBucket(String),
    /// A link found inside a script, with the script it came from
    LinkFinder { from: String, link: String },
}

impl Artifact {
    /// Short type name, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Url { .. } => "url",
            Artifact::Form(_) => "form",
            Artifact::UploadForm(_) => "upload-form",
            Artifact::Javascript(_) => "javascript",
            Artifact::Subdomain(_) => "subdomains",
            Artifact::AwsBucket(_) => "aws-s3",
            Artifact::LinkFinder { .. } => "linkfinder",
        }
    }

    /// The discovered string itself
    pub fn value(&self) -> &str {
        match self {
            Artifact::Url { url, .. } => url,
            Artifact::Form(v)
            | Artifact::UploadForm(v)
            | Artifact::Javascript(v)
            | Artifact::Subdomain(v)
            | Artifact::AwsBucket(v) => v,
            Artifact::LinkFinder { link, .. } => link,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Artifact::Url { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Where the artifact was found, when that is not the page body
    pub fn source(&self) -> Option<&str> {
        match self {
            Artifact::LinkFinder { from, .. } => Some(from),
            _ => None,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Url { status, url } => write!(f, "[url] - [code-{}] - {}", status, url),
            Artifact::LinkFinder { from, link } => {
                write!(f, "[linkfinder] - [from: {}] - {}", from, link)
            }
            other => write!(f, "[{}] - {}", other.kind(), other.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_formats() {
        let cases = [
            (
                Artifact::Url { status: 403, url: "https://example.com/admin".into() },
                "[url] - [code-403] - https://example.com/admin",
            ),
            (
                Artifact::Form("https://example.com/login".into()),
                "[form] - https://example.com/login",
            ),
            (
                Artifact::UploadForm("https://example.com/profile".into()),
                "[upload-form] - https://example.com/profile",
            ),
            (
                Artifact::Javascript("https://example.com/app.js".into()),
                "[javascript] - https://example.com/app.js",
            ),
            (
                Artifact::Subdomain("api.example.com".into()),
                "[subdomains] - api.example.com",
            ),
            (
                Artifact::AwsBucket("bucket.s3.amazonaws.com".into()),
                "[aws-s3] - bucket.s3.amazonaws.com",
            ),
            (
                Artifact::LinkFinder {
                    from: "https://example.com/app.js".into(),
                    link: "/api/v1/users".into(),
                },
                "[linkfinder] - [from: https://example.com/app.js] - /api/v1/users",
            ),
        ];

        for (artifact, line) in cases {
            assert_eq!(artifact.to_string(), line);
        }
    }
}
