use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchFailure;
use crate::traits::PageFetcher;

pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(8);

/// Identity sent to encyclopedia endpoints.
pub const PROJECT_USER_AGENT: &str = "MusicReviewAssistant/1.0 (educational project)";

/// Review aggregators reject obvious non-browser clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request timeout and headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub headers: Vec<(&'static str, String)>,
}

impl FetchOptions {
    pub fn encyclopedia() -> Self {
        Self {
            timeout: DEFAULT_PAGE_TIMEOUT,
            headers: vec![("User-Agent", PROJECT_USER_AGENT.to_string())],
        }
    }

    pub fn browser() -> Self {
        Self {
            timeout: DEFAULT_PAGE_TIMEOUT,
            headers: vec![
                ("User-Agent", BROWSER_USER_AGENT.to_string()),
                ("Accept", "text/html,application/xhtml+xml".to_string()),
                ("Accept-Language", "en-US,en;q=0.9".to_string()),
            ],
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Plain reqwest GET. One client is shared across all page fetches; timeout
/// and headers are applied per request.
#[derive(Clone, Default)]
pub struct HttpPageFetcher {
    http: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchFailure> {
        let mut request = self.http.get(url).timeout(options.timeout);
        for (name, value) in &options.headers {
            request = request.header(*name, value.as_str());
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "Page fetch rejected");
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        debug!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
