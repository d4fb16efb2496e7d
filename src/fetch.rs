use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;

/// Downloads the source documents feeds are generated from.
#[derive(Debug, Clone)]
pub struct Fetcher {
    http_client: Client,
}

impl Fetcher {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .connect_timeout(cfg.connect_timeout.into())
            .read_timeout(cfg.read_timeout.into())
            .timeout(cfg.request_timeout.into())
            .build()
            .context("could not create an HTTP client")?;

        Ok(Self { http_client })
    }

    /// Fetches `url` and parses the response body as JSON.
    ///
    /// Upstream errors are not fatal on their own: a non-2xx response is logged, and its body is
    /// parsed like any other.
    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        let url = Url::parse(url).with_context(|| anyhow!("`{url}` is not a valid URL"))?;

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .with_context(|| anyhow!("could not fetch `{url}`"))?;

        let status = response.status();

        if !status.is_success() {
            warn!("`{url}` responded with {status}");
        }

        let body = response
            .bytes()
            .await
            .with_context(|| anyhow!("could not read the response when fetching `{url}`"))?;
        debug!("Fetched {} bytes from `{url}`", body.len());

        serde_json::from_slice(&body)
            .with_context(|| anyhow!("the response from `{url}` is not valid JSON"))
    }
}
