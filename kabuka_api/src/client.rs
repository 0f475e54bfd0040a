//! HTTP client for the kabutan quote page.

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use url::Url;

use crate::{user_agent::get_user_agent, Error};

/// Production host of the quote page.
pub const DEFAULT_BASE_URL: &str = "https://kabutan.jp";

const QUOTE_PATH: &str = "/stock/kabuka";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;

/// Connection settings for [`Client`].
///
/// Timeout, redirect policy and compression are fixed; only the host and the
/// certificate posture can be changed.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Scheme and host, without a trailing path. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Verify the upstream certificate chain. Off unless explicitly enabled:
    /// the quote host is scraped as-is and its certificate is not trusted
    /// or checked. Turning this on is a hardening opt-in.
    pub verify_tls: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            verify_tls: false,
        }
    }
}

/// Client for the per-security quote page.
///
/// Each call makes exactly one GET with browser-like headers. There is no
/// retry; a failed fetch is reported once and the caller decides what to do.
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client pointing at the production host with default settings.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(FetchConfig::default())
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_config(FetchConfig {
            base_url: base_url.to_string(),
            ..FetchConfig::default()
        })
    }

    pub fn with_config(config: FetchConfig) -> Result<Self, Error> {
        if !config.verify_tls {
            tracing::debug!(
                "TLS certificate verification disabled for {}",
                config.base_url
            );
        }
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(REQUEST_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Build(e)
            })?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Builds the quote page URL for an already-normalized code.
    pub fn quote_url(&self, code: &str) -> Result<Url, Error> {
        let mut url = Url::parse(format!("{}{}", self.base_url, QUOTE_PATH).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::Url(e.to_string())
            })?;
        url.query_pairs_mut().append_pair("code", code);
        Ok(url)
    }

    /// Fetches the raw quote page HTML for `code`.
    pub async fn fetch_quote_page(&self, code: &str) -> Result<String, Error> {
        let url = self.quote_url(code)?;
        self.fetch_html(url).await
    }

    async fn fetch_html(&self, url: Url) -> Result<String, Error> {
        tracing::debug!("GET {}", url);
        let started = Instant::now();
        // Accept-Encoding is left to reqwest so that decompression stays automatic.
        let resp = self
            .http
            .get(url.clone())
            .header("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8")
            .header("accept-language", "ja,en-US;q=0.7,en;q=0.3")
            .header("upgrade-insecure-requests", "1")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", url, e);
                Error::Transport(e)
            })?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Transport(e)
        })?;

        tracing::info!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            content_type = %content_type,
            body_len = body.len(),
            "quote page fetched"
        );

        if status != StatusCode::OK {
            let snippet = truncate_body(&body);
            tracing::warn!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        if body.trim().is_empty() {
            tracing::warn!("Empty body from {}", url);
            return Err(Error::EmptyBody {
                status: status.as_u16(),
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
