//! Stories feed client.
//!
//! One authenticated `GET` per page against the account feed, sent with the
//! same browser-like headers the web app uses. The session cookie is passed
//! through as-is.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, DNT, REFERER, USER_AGENT,
};
use reqwest::{Client, Request};
use tracing::debug;
use venmo_core::{Cursor, Page, PageSource};

use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://account.venmo.com/api/stories";
const REFERER_URL: &str = "https://account.venmo.com/";

/// Longest slice of an error body kept in a status error.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// Fetches pages of one account's stories.
pub struct FeedClient {
    http: Client,
    base_url: String,
    external_id: String,
    headers: HeaderMap,
}

impl FeedClient {
    pub fn new(config: &FeedConfig, external_id: &str, cookie: &str) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            external_id: external_id.to_string(),
            headers: browser_headers(cookie, &config.user_agent)?,
        })
    }

    /// Build the request for the page at `cursor`. `nextId` is only sent
    /// once the feed has handed out a cursor.
    pub fn request_for(&self, cursor: &Cursor) -> Result<Request, FetchError> {
        let mut query = vec![("feedType", "me"), ("externalId", self.external_id.as_str())];
        if let Some(token) = cursor.token() {
            query.push(("nextId", token));
        }

        self.http
            .get(&self.base_url)
            .query(&query)
            .headers(self.headers.clone())
            .build()
            .map_err(FetchError::Request)
    }

    pub async fn fetch(&self, cursor: &Cursor) -> Result<Page, FetchError> {
        let request = self.request_for(cursor)?;
        debug!(has_cursor = cursor.token().is_some(), "Fetching stories page");

        let resp = self.http.execute(request).await.map_err(FetchError::Transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(FetchError::Transport)?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate(&body, MAX_ERROR_BODY).to_string(),
            });
        }

        decode_page(&body)
    }
}

#[async_trait]
impl PageSource for FeedClient {
    async fn fetch_page(&mut self, cursor: &Cursor) -> anyhow::Result<Page> {
        Ok(self.fetch(cursor).await?)
    }
}

pub fn decode_page(body: &str) -> Result<Page, FetchError> {
    serde_json::from_str(body).map_err(FetchError::Decode)
}

fn browser_headers(cookie: &str, user_agent: &str) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(REFERER, HeaderValue::from_static(REFERER_URL));
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(r#""Chromium";v="129", "Not=A?Brand";v="8""#),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static(r#""macOS""#),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent).map_err(|_| FetchError::InvalidHeader("user-agent"))?,
    );

    let mut cookie = HeaderValue::from_str(cookie).map_err(|_| FetchError::InvalidHeader("cookie"))?;
    cookie.set_sensitive(true);
    headers.insert(COOKIE, cookie);

    Ok(headers)
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
