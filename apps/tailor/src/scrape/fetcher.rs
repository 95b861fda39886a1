//! Web fetching: downloads a job posting and rejects non-HTML content.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, info};

use crate::errors::AppError;

const FETCH_TIMEOUT_SECS: u64 = 20;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// The web collaborator: URL in, raw HTML out.
#[async_trait]
pub trait WebFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, AppError>;
}

/// `reqwest`-backed fetcher with a browser user agent and a fixed deadline.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Fetch(format!("could not build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        info!("Attempting to scrape URL: {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!("{url} returned status {status}")));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        debug!("Response Content-Type: {content_type:?}");

        if !is_html_content_type(&content_type) {
            return Err(AppError::Fetch(format!(
                "{url} is not an HTML page (content-type '{content_type}')"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("could not read body of {url}: {e}")))
    }
}

fn is_html_content_type(content_type: &str) -> bool {
    content_type.contains("html")
}
