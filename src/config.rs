// src/config.rs
// =============================================================================
// This module turns raw command-line values into a validated CrawlConfig.
//
// Everything that can make a crawl impossible is checked here, BEFORE the
// first request is sent:
// - the site must be a URL with a host (the host becomes the scope token)
// - the concurrency limit must be at least 1
// - the blacklist must be a valid regex
// - headers must look like "Name: Value"
// - a --burp file must be readable and look like an HTTP request
//
// Rust concepts:
// - thiserror: derive std::error::Error for our own error enum
// - Duration: type-safe time spans instead of raw integers
// - impl blocks with associated functions (CrawlConfig::new)
// =============================================================================

use crate::cli::Cli;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

// Everything that can go wrong while building the configuration
//
// All of these are fatal: main() prints them and exits with status 1.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid site URL '{site}': {source}")]
    InvalidSite {
        site: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to parse domain from '{0}'")]
    MissingDomain(String),

    #[error("invalid limit rule: {0}")]
    InvalidLimitRule(String),

    #[error("invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid header '{0}', expected 'Name: Value'")]
    InvalidHeader(String),

    #[error("failed to read burp file {path}: {source}")]
    BurpFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse raw request in {0}")]
    InvalidBurpRequest(PathBuf),

    #[error("failed to open output file {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

// How the User-Agent header is chosen for each request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAgentMode {
    /// A random desktop browser User-Agent per request
    Web,
    /// A random mobile browser User-Agent per request
    Mobile,
    /// Always the same, user-supplied value
    Custom(String),
}

impl UserAgentMode {
    // "web" and "mobi" are keywords, anything else is used literally
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "web" => UserAgentMode::Web,
            "mobi" => UserAgentMode::Mobile,
            _ => UserAgentMode::Custom(value.to_string()),
        }
    }
}

// The validated, immutable settings of one crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The root URL of the crawl
    pub site: Url,
    /// Hostname of the site without scheme and port - the scope token
    pub domain: String,
    /// Maximum depth, 0 = unlimited
    pub max_depth: usize,
    /// Parallel requests allowed per domain
    pub concurrency: usize,
    pub delay: Duration,
    pub random_delay: Duration,
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub headers: Vec<(String, String)>,
    pub cookie: Option<String>,
    /// User-supplied blacklist regex, on top of the static-asset one
    pub blacklist: Option<String>,
    pub follow_redirects: bool,
    pub user_agent: UserAgentMode,
    pub output_dir: Option<PathBuf>,
    pub json: bool,
}

impl CrawlConfig {
    // Creates a configuration for `site` with the same defaults as the CLI
    pub fn new(site: &str) -> Result<Self, ConfigError> {
        let mut site_url = Url::parse(site).map_err(|source| ConfigError::InvalidSite {
            site: site.to_string(),
            source,
        })?;
        // The site is a dedup key and a Referer like every other page URL
        site_url.set_fragment(None);
        let domain = derive_domain(&site_url)
            .ok_or_else(|| ConfigError::MissingDomain(site.to_string()))?;

        Ok(Self {
            site: site_url,
            domain,
            max_depth: 1,
            concurrency: 5,
            delay: Duration::ZERO,
            random_delay: Duration::ZERO,
            timeout: Duration::from_secs(10),
            proxy: None,
            headers: Vec::new(),
            cookie: None,
            blacklist: None,
            follow_redirects: true,
            user_agent: UserAgentMode::Web,
            output_dir: None,
            json: false,
        })
    }

    // Builds the configuration from parsed command-line flags
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::new(&cli.site)?;

        config.max_depth = cli.depth;
        config.concurrency = cli.concurrent;
        config.delay = Duration::from_secs(cli.delay);
        config.random_delay = Duration::from_secs(cli.random_delay);
        config.timeout = Duration::from_secs(cli.timeout);
        config.proxy = cli.proxy.clone().filter(|p| !p.trim().is_empty());
        config.blacklist = cli.blacklist.clone().filter(|b| !b.is_empty());
        config.follow_redirects = !cli.no_redirect;
        config.user_agent = UserAgentMode::parse(&cli.user_agent);
        config.output_dir = cli.output.clone();
        config.json = cli.json;

        // A burp request replaces both --header and --cookie
        if let Some(path) = &cli.burp {
            let (headers, cookie) = read_burp_file(path)?;
            config.headers = headers;
            config.cookie = cookie;
        } else {
            config.headers = cli
                .headers
                .iter()
                .map(|h| parse_header(h))
                .collect::<Result<_, _>>()?;
            config.cookie = cli.cookie.clone().filter(|c| !c.is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    // Checks the limits and patterns that would make the crawl impossible
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidLimitRule(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if let Some(pattern) = &self.blacklist {
            regex::Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    // Where the persisted log goes: <output>/<host with dots as underscores>
    pub fn output_file(&self) -> Option<PathBuf> {
        let dir = self.output_dir.as_ref()?;
        let host = self.site.host_str().unwrap_or(&self.domain);
        Some(dir.join(host.replace('.', "_")))
    }
}

// Returns the hostname of a URL, lowercased, without scheme or port
//
// Example: "https://Example.com:8443/a" -> "example.com"
pub fn derive_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_matches(|c| c == '[' || c == ']');
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

// Parses "Name: Value" into a (name, value) pair, both trimmed
pub fn parse_header(raw: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidHeader(raw.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn read_burp_file(path: &Path) -> Result<(Vec<(String, String)>, Option<String>), ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::BurpFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_burp_request(&raw).ok_or_else(|| ConfigError::InvalidBurpRequest(path.to_path_buf()))
}

// Splits a raw HTTP request into its headers and its Cookie value
//
// Host and Content-Length describe the captured request, not ours, so they
// are not replayed. Returns None if the first line is not a request line.
pub fn parse_burp_request(raw: &str) -> Option<(Vec<(String, String)>, Option<String>)> {
    let mut lines = raw.lines();

    let request_line = lines.next()?.trim();
    let mut parts = request_line.split_whitespace();
    let (_method, _target, version) = (parts.next()?, parts.next()?, parts.next()?);
    if !version.starts_with("HTTP/") {
        return None;
    }

    let mut headers = Vec::new();
    let mut cookie = None;
    for line in lines {
        let line = line.trim_end_matches('\r');
        // A blank line ends the header block; the body is ignored
        if line.trim().is_empty() {
            break;
        }
        let (name, value) = parse_header(line).ok()?;
        match name.to_lowercase().as_str() {
            "cookie" => cookie = Some(value),
            "host" | "content-length" => {}
            _ => headers.push((name, value)),
        }
    }

    Some((headers, cookie))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_domain_strips_scheme_and_port() {
        let config = CrawlConfig::new("https://Sub.Example.com:8443/path").unwrap();
        assert_eq!(config.domain, "sub.example.com");
    }

    #[test]
    fn test_site_fragment_is_dropped() {
        let config = CrawlConfig::new("https://example.com/#top").unwrap();
        assert_eq!(config.site.as_str(), "https://example.com/");
    }

    #[test]
    fn test_site_without_host_is_fatal() {
        let err = CrawlConfig::new("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDomain(_)));

        let err = CrawlConfig::new("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSite { .. }));
    }

    #[test]
    fn test_zero_concurrency_is_fatal() {
        let cli = Cli::parse_from(["scope-spider", "-s", "https://example.com", "-c", "0"]);
        let err = CrawlConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLimitRule(_)));
    }

    #[test]
    fn test_bad_blacklist_is_fatal() {
        let cli = Cli::parse_from([
            "scope-spider",
            "-s",
            "https://example.com",
            "--blacklist",
            "logout(",
        ]);
        let err = CrawlConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_headers_and_user_agent() {
        let cli = Cli::parse_from([
            "scope-spider",
            "-s",
            "https://example.com",
            "-H",
            "X-Api-Key:  secret ",
            "--cookie",
            "a=1",
            "-u",
            "mobi",
            "--no-redirect",
        ]);
        let config = CrawlConfig::from_cli(&cli).unwrap();
        assert_eq!(config.headers, vec![("X-Api-Key".to_string(), "secret".to_string())]);
        assert_eq!(config.cookie.as_deref(), Some("a=1"));
        assert_eq!(config.user_agent, UserAgentMode::Mobile);
        assert!(!config.follow_redirects);
    }

    #[test]
    fn test_malformed_header_is_fatal() {
        assert!(matches!(
            parse_header("no colon here"),
            Err(ConfigError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_custom_user_agent_keeps_case() {
        assert_eq!(
            UserAgentMode::parse("MyBot/1.0"),
            UserAgentMode::Custom("MyBot/1.0".to_string())
        );
        assert_eq!(UserAgentMode::parse("WEB"), UserAgentMode::Web);
    }

    #[test]
    fn test_parse_burp_request() {
        let raw = "GET /account HTTP/1.1\r\n\
                   Host: example.com\r\n\
                   Cookie: session=abc\r\n\
                   Authorization: Bearer t0k3n\r\n\
                   Content-Length: 0\r\n\
                   \r\n\
                   ignored=body";
        let (headers, cookie) = parse_burp_request(raw).unwrap();
        assert_eq!(cookie.as_deref(), Some("session=abc"));
        assert_eq!(
            headers,
            vec![("Authorization".to_string(), "Bearer t0k3n".to_string())]
        );
    }

    #[test]
    fn test_burp_file_overrides_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.txt");
        std::fs::write(&path, "POST /login HTTP/1.1\nCookie: id=7\nX-From: burp\n\n").unwrap();

        let cli = Cli::parse_from([
            "scope-spider",
            "-s",
            "https://example.com",
            "-H",
            "X-From: cli",
            "--cookie",
            "id=1",
            "--burp",
            path.to_str().unwrap(),
        ]);
        let config = CrawlConfig::from_cli(&cli).unwrap();
        assert_eq!(config.headers, vec![("X-From".to_string(), "burp".to_string())]);
        assert_eq!(config.cookie.as_deref(), Some("id=7"));
    }

    #[test]
    fn test_not_a_request_is_rejected() {
        assert!(parse_burp_request("hello world").is_none());
        assert!(parse_burp_request("").is_none());
    }

    #[test]
    fn test_output_file_name() {
        let mut config = CrawlConfig::new("https://www.example.com").unwrap();
        assert_eq!(config.output_file(), None);
        config.output_dir = Some(PathBuf::from("out"));
        assert_eq!(config.output_file(), Some(PathBuf::from("out/www_example_com")));
    }
}
