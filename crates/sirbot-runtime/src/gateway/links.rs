//! HTTP existence check for links.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use tracing::trace;

use sirbot_core::{ApiError, ApiResult, LinkChecker};

#[derive(Debug, Clone)]
pub struct HttpLinkChecker {
    client: Client,
}

impl HttpLinkChecker {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: ClientBuilder::new().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl LinkChecker for HttpLinkChecker {
    async fn status(&self, url: &str) -> ApiResult<u16> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        trace!(url, status, "Checked link");
        Ok(status)
    }
}
