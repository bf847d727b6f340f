//! RedGifs API client: transient token cache and media URL resolution.

use regex::Regex;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;

use crate::error::{Error, Result};

/// RedGifs API base URL.
const API_BASE: &str = "https://api.redgifs.com";

/// Browser User-Agent for the RedGifs API, which rejects non-browser agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Content ID pattern covering the host's known path shapes:
/// `/watch/<id>`, `/ifr/<id>`, and bare `/<id>`.
const GIF_ID_PATTERN: &str = r"redgifs\.com/(?:watch/|ifr/)?([a-zA-Z0-9]+)";

/// Outcome of resolving a post URL against the host API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Downloadable HD media URL.
    Media(String),

    /// The URL or metadata did not yield a media URL. Logged and skipped,
    /// never an error.
    NotFound,

    /// 410 from the host: content permanently removed upstream. Terminal,
    /// counted separately, never retried.
    Gone,
}

#[derive(Debug, Deserialize)]
struct TemporaryToken {
    token: String,
}

#[derive(Debug, Deserialize)]
struct GifResponse {
    gif: GifInfo,
}

#[derive(Debug, Deserialize)]
struct GifInfo {
    urls: GifUrls,
}

#[derive(Debug, Deserialize)]
struct GifUrls {
    hd: Option<String>,
}

/// RedGifs client owning the cached bearer token.
///
/// The token is acquired lazily on first use and never proactively expired;
/// a 401 from the metadata endpoint is the only invalidation trigger.
pub struct RedgifsClient {
    http: Client,
    base_url: String,
    id_pattern: Regex,
    token: Option<String>,
}

impl RedgifsClient {
    /// Create a client against the production API.
    ///
    /// The reqwest client is shared with the rest of the pipeline so all
    /// requests go through one connection pool.
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, API_BASE.to_string())
    }

    /// Create a client against a custom API base URL.
    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self {
            http,
            base_url,
            // The pattern is a valid literal; compilation cannot fail.
            id_pattern: Regex::new(GIF_ID_PATTERN).expect("invalid gif ID pattern"),
            token: None,
        }
    }

    /// Drop the cached token so the next call re-authenticates.
    pub fn invalidate(&mut self) {
        self.token = None;
    }

    /// Return the cached token, authenticating first if the cache is empty.
    async fn token(&mut self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        self.authenticate().await
    }

    /// Fetch a new temporary token. On failure the cache stays empty and the
    /// next call retries from scratch; there is no backoff at this layer.
    async fn authenticate(&mut self) -> Result<String> {
        let url = format!("{}/v2/auth/temporary", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Authentication(format!(
                "temporary token request failed: HTTP {}",
                response.status()
            )));
        }

        let token: TemporaryToken = response.json().await?;
        tracing::trace!("acquired new RedGifs token");
        self.token = Some(token.token.clone());
        Ok(token.token)
    }

    /// Resolve a post URL to a downloadable media URL.
    ///
    /// A 401 from the metadata endpoint invalidates the token, re-authenticates
    /// once, and retries the call exactly once; a second 401 is an error rather
    /// than a retry loop.
    pub async fn resolve(&mut self, post_url: &str) -> Result<Resolution> {
        let Some(id) = self.extract_id(post_url) else {
            tracing::warn!(url = %post_url, "could not parse RedGifs ID");
            return Ok(Resolution::NotFound);
        };

        let token = self.token().await?;
        let mut response = self.fetch_metadata(&id, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("RedGifs token expired, refreshing");
            self.invalidate();
            let token = self.token().await?;
            response = self.fetch_metadata(&id, &token).await?;
        }

        match response.status() {
            StatusCode::GONE => return Ok(Resolution::Gone),
            status if !status.is_success() => {
                return Err(Error::Api(format!(
                    "RedGifs metadata request for {} failed: HTTP {}",
                    id, status
                )));
            }
            _ => {}
        }

        let metadata: GifResponse = response.json().await?;
        match metadata.gif.urls.hd {
            Some(url) => Ok(Resolution::Media(url)),
            None => {
                tracing::warn!(id = %id, "no HD URL in RedGifs metadata");
                Ok(Resolution::NotFound)
            }
        }
    }

    async fn fetch_metadata(&self, id: &str, token: &str) -> Result<reqwest::Response> {
        let url = format!("{}/v2/gifs/{}", self.base_url, id);
        let response = self
            .http
            .get(&url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response)
    }

    fn extract_id(&self, post_url: &str) -> Option<String> {
        self.id_pattern
            .captures(post_url)
            .map(|captures| captures[1].to_string())
    }
}
