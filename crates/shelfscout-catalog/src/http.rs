use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::{CatalogError, Result};

// ─── CatalogHttpClient ────────────────────────────────────────────────────────

/// Single-shot JSON GET client. Every request is bounded by `timeout`;
/// failures are classified rather than retried.
#[derive(Debug, Clone)]
pub struct CatalogHttpClient {
    client: reqwest::Client,
}

impl CatalogHttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| CatalogError::NetworkError(format!("failed to build client: {e}")))?;
        Ok(Self { client })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let resp = self.client.get(url).send().await?;
        check_status(resp.status())?;

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::MalformedResponse(e.to_string()))
    }
}

fn check_status(status: StatusCode) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(CatalogError::RateLimited);
    }
    if status.is_server_error() {
        return Err(CatalogError::UpstreamUnavailable {
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Err(CatalogError::NetworkError(format!("HTTP {}", status.as_u16())));
    }
    Ok(())
}
