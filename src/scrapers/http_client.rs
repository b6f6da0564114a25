//! Paced HTTP client for the target site.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use tracing::debug;

use crate::config::{self, Pacing};

/// Thin wrapper around a reqwest client that absorbs failures and enforces
/// the mandatory inter-request delays.
///
/// Built once per crawl session and dropped with it. Fetch methods return
/// `None` on any network error or non-2xx status; callers treat that as
/// "the unit is unavailable".
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    pacing: Pacing,
}

impl HttpClient {
    pub fn new(pacing: Pacing) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(config::ACCEPT_LANGUAGE),
        );

        let client = Client::builder()
            .user_agent(config::USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(pacing.request_timeout_secs))
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, pacing }
    }

    /// GET a URL and return its body, or None on any failure.
    pub async fn get_text(&self, url: &str) -> Option<String> {
        self.request(url, None).await
    }

    /// GET a URL with an explicit Referer header.
    pub async fn get_text_with_referer(&self, url: &str, referer: &str) -> Option<String> {
        self.request(url, Some(referer)).await
    }

    async fn request(&self, url: &str, referer: Option<&str>) -> Option<String> {
        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            if let Ok(value) = HeaderValue::from_str(referer) {
                request = request.header(REFERER, value);
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(url, %err, "request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url, %status, "non-success status");
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(err) => {
                debug!(url, %err, "failed to read body");
                None
            }
        }
    }

    /// Sleep for the per-post request delay.
    pub async fn pace_post(&self) {
        tokio::time::sleep(Duration::from_millis(self.pacing.post_delay_ms)).await;
    }

    /// Sleep for the blog-info request delay.
    pub async fn pace_blog_info(&self) {
        tokio::time::sleep(Duration::from_millis(self.pacing.blog_info_delay_ms)).await;
    }

    /// Sleep for the comment request delay.
    pub async fn pace_comments(&self) {
        tokio::time::sleep(Duration::from_millis(self.pacing.comment_delay_ms)).await;
    }
}
