//! Implements the `Source` trait over HTTP using `reqwest`.

use crate::api::Source;
use crate::Result;
use anyhow::{bail, Context};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::trace;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches published CSV exports over HTTP. Every request asks intermediate caches for a fresh
/// copy.
pub(crate) struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub(crate) fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    async fn get(&mut self, url: &Url) -> Result<String> {
        trace!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {}", status.as_u16());
        }

        response
            .text()
            .await
            .with_context(|| format!("Unable to read the response body from {url}"))
    }
}
