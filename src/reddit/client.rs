//! Reddit saved-posts feed client.

use reqwest::{header, Client, StatusCode};

use crate::config::RedditConfig;
use crate::error::{Error, Result};
use crate::media::SavedPost;
use crate::reddit::types::{AccessToken, Listing};

/// Base URL for the token endpoint.
const AUTH_BASE: &str = "https://www.reddit.com";

/// Base URL for authenticated API calls.
const API_BASE: &str = "https://oauth.reddit.com";

/// Posts requested per listing page (the API maximum).
const PAGE_SIZE: u32 = 100;

/// One page of the saved-posts feed.
#[derive(Debug)]
pub struct SavedPage {
    pub posts: Vec<SavedPost>,

    /// Cursor for the next page; `None` when the feed is exhausted.
    pub after: Option<String>,
}

/// Authenticated client for the saved-posts listing.
///
/// Holds the OAuth bearer token for a script-type application, acquired via
/// the password grant on first use and refreshed once on a 401.
pub struct RedditClient {
    http: Client,
    auth_base: String,
    api_base: String,
    credentials: RedditConfig,
    token: Option<String>,
}

impl RedditClient {
    /// Create a client against the production endpoints.
    pub fn new(http: Client, credentials: RedditConfig) -> Self {
        Self::with_base_urls(http, credentials, AUTH_BASE.to_string(), API_BASE.to_string())
    }

    /// Create a client against custom endpoints.
    pub fn with_base_urls(
        http: Client,
        credentials: RedditConfig,
        auth_base: String,
        api_base: String,
    ) -> Self {
        Self {
            http,
            auth_base,
            api_base,
            credentials,
            token: None,
        }
    }

    async fn token(&mut self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        self.authenticate().await
    }

    /// Obtain an OAuth token through the password grant.
    async fn authenticate(&mut self) -> Result<String> {
        let url = format!("{}/api/v1/access_token", self.auth_base);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .header(header::USER_AGENT, &self.credentials.user_agent)
            .form(&[
                ("grant_type", "password"),
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Authentication(format!(
                "access token request failed: HTTP {}",
                response.status()
            )));
        }

        let token: AccessToken = response.json().await?;
        tracing::debug!("authenticated with Reddit");
        self.token = Some(token.access_token.clone());
        Ok(token.access_token)
    }

    /// Fetch one page of the saved-posts feed.
    ///
    /// Saved comments (`t1` children) are filtered out; only link posts are
    /// returned. An expired token is refreshed once before giving up.
    pub async fn saved_page(&mut self, after: Option<&str>) -> Result<SavedPage> {
        let token = self.token().await?;
        let mut response = self.fetch_listing(after, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("Reddit token expired, refreshing");
            self.token = None;
            let token = self.token().await?;
            response = self.fetch_listing(after, &token).await?;
        }

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "saved listing request failed: HTTP {}",
                response.status()
            )));
        }

        let listing: Listing = response.json().await?;
        let posts = listing
            .data
            .children
            .into_iter()
            .filter(|child| child.kind == "t3")
            .map(|child| child.data.into_saved_post())
            .collect();

        Ok(SavedPage {
            posts,
            after: listing.data.after,
        })
    }

    async fn fetch_listing(
        &self,
        after: Option<&str>,
        token: &str,
    ) -> Result<reqwest::Response> {
        let url = format!(
            "{}/user/{}/saved",
            self.api_base, self.credentials.username
        );
        let mut request = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(header::USER_AGENT, &self.credentials.user_agent)
            .query(&[
                ("limit", PAGE_SIZE.to_string().as_str()),
                ("raw_json", "1"),
            ]);
        if let Some(after) = after {
            request = request.query(&[("after", after)]);
        }
        Ok(request.send().await?)
    }
}
