// src/crawl/fetch.rs
// =============================================================================
// This module makes the HTTP requests.
//
// One reqwest Client is built per crawl and shared by every task (it is
// cheap to clone and pools connections). It is configured once with:
// - the request timeout
// - TLS verification OFF (targets often run self-signed certificates)
// - the proxy, if any, and NO proxy from the environment otherwise
// - the redirect policy (--no-redirect); a hop that leaves the scope is not
//   followed, the 3xx answer is returned instead
// - the static headers and cookie
//
// The User-Agent and Referer change per request, so they are set in fetch().
//
// Rust concepts:
// - thiserror: our own error enum instead of passing reqwest::Error around
// - From<reqwest::Error>: lets `?` convert errors automatically
// =============================================================================

use crate::config::{ConfigError, CrawlConfig, UserAgentMode};
use crate::scope::ScopeFilter;
use rand::seq::IndexedRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, REFERER, USER_AGENT,
};
use reqwest::{redirect, Client};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use url::Url;

const MAX_REDIRECTS: usize = 10;

const DESKTOP_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.67",
];

const MOBILE_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 13; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

// Why a request produced no response
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("could not resolve hostname")]
    Dns,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("failed to read body: {0}")]
    Body(String),
    #[error("request failed: {0}")]
    Request(String),
}

// Sorts reqwest errors into the cases we care about
impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        let detail = format!("{:?}", error).to_lowercase();

        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if error.is_connect() {
            if detail.contains("dns") || detail.contains("resolve") {
                FetchError::Dns
            } else {
                FetchError::Connect(message)
            }
        } else if detail.contains("certificate") || detail.contains("tls") {
            FetchError::Tls(message)
        } else if error.is_body() || error.is_decode() {
            FetchError::Body(message)
        } else {
            FetchError::Request(message)
        }
    }
}

/// One answered request
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The URL after redirects; relative links resolve against this
    pub final_url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    /// Only read for 2xx responses, empty otherwise
    pub body: String,
}

impl FetchOutcome {
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(false, |ct| ct.to_lowercase().contains("html"))
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    user_agent: UserAgentMode,
    // A -H "User-Agent: ..." header beats --user-agent
    fixed_user_agent: bool,
}

impl Fetcher {
    pub fn new(config: &CrawlConfig, scope: Arc<ScopeFilter>) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let invalid = || ConfigError::InvalidHeader(format!("{}: {}", name, value));
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(name, value);
        }
        if let Some(cookie) = &config.cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| ConfigError::InvalidHeader(format!("Cookie: {}", cookie)))?;
            headers.insert(COOKIE, value);
        }
        let fixed_user_agent = headers.contains_key(USER_AGENT);

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(true)
            .redirect(redirect_policy(config.follow_redirects, scope))
            .default_headers(headers);

        builder = match config.proxy.as_deref().map(reqwest::Proxy::all) {
            Some(Ok(proxy)) => builder.proxy(proxy),
            Some(Err(e)) => {
                warn!("Failed to set proxy: {}", e);
                builder.no_proxy()
            }
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
            user_agent: config.user_agent.clone(),
            fixed_user_agent,
        })
    }

    // GETs `url`; any transport failure is an Err, any HTTP status is Ok
    pub async fn fetch(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> Result<FetchOutcome, FetchError> {
        let mut request = self.client.get(url);
        if let Some(agent) = self.pick_user_agent() {
            request = request.header(USER_AGENT, agent);
        }
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = if response.status().is_success() {
            let bytes = response.bytes().await?;
            String::from_utf8_lossy(&bytes).into_owned()
        } else {
            String::new()
        };

        Ok(FetchOutcome {
            final_url,
            status,
            content_type,
            body,
        })
    }

    fn pick_user_agent(&self) -> Option<String> {
        if self.fixed_user_agent {
            return None;
        }
        match &self.user_agent {
            UserAgentMode::Web => random_agent(DESKTOP_AGENTS),
            UserAgentMode::Mobile => random_agent(MOBILE_AGENTS),
            UserAgentMode::Custom(agent) => Some(agent.clone()),
        }
    }
}

// Follows at most MAX_REDIRECTS hops, and only while they stay in scope
fn redirect_policy(follow: bool, scope: Arc<ScopeFilter>) -> redirect::Policy {
    if !follow {
        return redirect::Policy::none();
    }
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if !scope.in_scope(attempt.url().as_str()) {
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

fn random_agent(agents: &[&str]) -> Option<String> {
    agents.choose(&mut rand::rng()).map(|agent| agent.to_string())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is a 404 an Ok(...)?
//    - reqwest only fails when there is NO response (DNS, refused, timeout)
//    - a 404 is a perfectly good response; deciding what it means is the
//      dispatcher's job, not the transport's
//
// 2. What is from_utf8_lossy?
//    - turns bytes into text, replacing invalid UTF-8 with U+FFFD
//    - so a binary or badly-encoded body can still be scanned
//
// 3. Why format!("{:?}", error) for DNS detection?
//    - reqwest has no is_dns() method; the resolver failure only shows up in
//      the debug output of the underlying error chain
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn build(config: &CrawlConfig) -> Result<Fetcher, ConfigError> {
        let scope = ScopeFilter::new(&config.domain, config.blacklist.as_deref())?;
        Fetcher::new(config, Arc::new(scope))
    }

    #[tokio::test]
    async fn test_fetch_sends_static_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("x-api-key", "secret"))
            .and(header("cookie", "session=1"))
            .and(header("user-agent", "scope-spider-test"))
            .and(header("referer", "http://from.test/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<p>hi</p>", "text/html"))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = CrawlConfig::new(&server.uri()).unwrap();
        config.headers = vec![("X-Api-Key".to_string(), "secret".to_string())];
        config.cookie = Some("session=1".to_string());
        config.user_agent = UserAgentMode::Custom("scope-spider-test".to_string());

        let fetcher = build(&config).unwrap();
        let outcome = fetcher
            .fetch(&format!("{}/", server.uri()), Some("http://from.test/"))
            .await
            .unwrap();

        assert_eq!(outcome.status, 200);
        assert!(outcome.is_html());
        assert_eq!(outcome.body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .mount(&server)
            .await;

        let config = CrawlConfig::new(&server.uri()).unwrap();
        let outcome = build(&config)
            .unwrap()
            .fetch(&server.uri(), None)
            .await
            .unwrap();
        assert_eq!(outcome.status, 403);
        assert!(outcome.body.is_empty());
    }

    #[tokio::test]
    async fn test_no_redirect_returns_3xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
            .mount(&server)
            .await;

        let mut config = CrawlConfig::new(&server.uri()).unwrap();
        config.follow_redirects = false;
        let outcome = build(&config)
            .unwrap()
            .fetch(&format!("{}/old", server.uri()), None)
            .await
            .unwrap();
        assert_eq!(outcome.status, 301);
    }

    #[tokio::test]
    async fn test_redirect_inside_scope_is_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .expect(1)
            .mount(&server)
            .await;

        let config = CrawlConfig::new(&server.uri()).unwrap();
        let outcome = build(&config)
            .unwrap()
            .fetch(&format!("{}/old", server.uri()), None)
            .await
            .unwrap();
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.final_url.path(), "/new");
        assert_eq!(outcome.body, "moved");
    }

    #[tokio::test]
    async fn test_redirect_out_of_scope_is_not_followed() {
        let site = MockServer::start().await;
        let elsewhere = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/landing", elsewhere.uri()).as_str()),
            )
            .mount(&site)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("other host"))
            .expect(0)
            .mount(&elsewhere)
            .await;

        // "localhost" is the scope, the redirect points at 127.0.0.1
        let site_url = format!("http://localhost:{}/", site.address().port());
        let config = CrawlConfig::new(&site_url).unwrap();
        let outcome = build(&config).unwrap().fetch(&site_url, None).await.unwrap();

        assert_eq!(outcome.status, 302);
        assert!(outcome.body.is_empty());
        elsewhere.verify().await;
    }

    #[tokio::test]
    async fn test_refused_connection_is_an_error() {
        let config = CrawlConfig::new("http://127.0.0.1:1").unwrap();
        let result = build(&config)
            .unwrap()
            .fetch("http://127.0.0.1:1/", None)
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_header_is_a_config_error() {
        let mut config = CrawlConfig::new("https://example.com").unwrap();
        config.headers = vec![("Bad Header".to_string(), "x".to_string())];
        assert!(matches!(
            build(&config),
            Err(ConfigError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_user_agent_header_beats_mode() {
        let mut config = CrawlConfig::new("https://example.com").unwrap();
        config.headers = vec![("User-Agent".to_string(), "custom".to_string())];
        let fetcher = build(&config).unwrap();
        assert_eq!(fetcher.pick_user_agent(), None);

        config.headers.clear();
        config.user_agent = UserAgentMode::Mobile;
        let agent = build(&config).unwrap().pick_user_agent().unwrap();
        assert!(MOBILE_AGENTS.contains(&agent.as_str()));
    }
}
