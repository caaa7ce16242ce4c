pub mod error;
pub mod types;

pub use error::{Result, SerperError};
pub use types::{SearchOptions, SearchRequest};

use std::time::Duration;

const BASE_URL: &str = "https://google.serper.dev";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SerperClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    options: SearchOptions,
}

impl SerperClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_http(DEFAULT_TIMEOUT)?,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            options: SearchOptions::default(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("SERPER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SerperError::Config("SERPER_API_KEY environment variable not set".to_string())
            })?;
        Self::new(api_key)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_http(timeout)?;
        Ok(self)
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Run a web search and return the raw JSON payload.
    ///
    /// Serper answers with an object holding `organic`, `knowledgeGraph`,
    /// `peopleAlsoAsk` and friends; callers pick what they need.
    pub async fn search(&self, query: &str) -> Result<serde_json::Value> {
        tracing::info!(query, num = self.options.num, "Serper search");

        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest::new(query, &self.options))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SerperError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let payload: serde_json::Value = serde_json::from_str(&body)?;

        let count = payload
            .get("organic")
            .and_then(|o| o.as_array())
            .map(|o| o.len())
            .unwrap_or(0);
        tracing::info!(query, count, "Serper search complete");

        Ok(payload)
    }
}

fn build_http(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SerperError::Config(format!("Failed to build HTTP client: {e}")))
}
