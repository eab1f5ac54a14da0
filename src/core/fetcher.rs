use crate::domain::model::NO_WEBSITE;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DIAGNOSTIC_LIMIT: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("No website found")]
    NoWebsite,

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Transport(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Status { .. } | FetchError::Transport(_))
    }

    /// Short text recorded in a score's details.
    pub fn diagnostic(&self) -> String {
        match self {
            FetchError::NoWebsite => "No website found".to_string(),
            FetchError::Status { .. } | FetchError::Transport(_) => {
                let message: String = self.to_string().chars().take(DIAGNOSTIC_LIMIT).collect();
                format!("Error: {}", message)
            }
            FetchError::Unexpected(_) => "Unexpected error".to_string(),
        }
    }

    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout()
            || e.is_connect()
            || e.is_request()
            || e.is_redirect()
            || e.is_builder()
            || e.is_status()
            || e.is_body()
            || e.is_decode()
        {
            FetchError::Transport(e.to_string())
        } else {
            FetchError::Unexpected(e.to_string())
        }
    }
}

/// True when `url` is worth requesting at all.
pub fn is_usable_url(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && url != NO_WEBSITE && (url.contains("http://") || url.contains("https://"))
}

/// Retrieves a candidate website's HTML. One request per call, no retries.
#[derive(Debug, Clone)]
pub struct WebsiteFetcher {
    client: Client,
    timeout: Duration,
}

impl WebsiteFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        if !is_usable_url(url) {
            return Err(FetchError::NoWebsite);
        }
        let url = url.trim();

        tracing::debug!("Fetching website: {}", url);
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Website {} answered HTTP {}", url, status);
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(FetchError::from_reqwest)
    }
}
