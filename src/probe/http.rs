use crate::Result;
use crate::metrics::Snapshot;
use crate::probe::source::SnapshotSource;
use async_trait::async_trait;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use url::Url;

const LOG_TARGET: &str = "      http";

/// Fetches exposition text from an HTTP metrics endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
    bearer_token: Option<String>,
}

impl HttpSource {
    /// Create a source for the given endpoint.
    ///
    /// The timeout bounds each whole request; the session adds no timeout
    /// of its own. When a bearer token is supplied it is sent with every
    /// fetch.
    pub fn new(url: Url, bearer_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("slometer")
            .timeout(timeout)
            .build()
            .into_app_err("creating HTTP client")?;

        Ok(Self {
            client,
            url,
            bearer_token,
        })
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&mut self) -> Result<Snapshot> {
        log::debug!(target: LOG_TARGET, "Fetching metrics from '{}'", self.url);

        let mut request = self.client.get(self.url.clone());
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .into_app_err_with(|| format!("requesting metrics from '{}'", self.url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("metrics endpoint '{}' returned {status}", self.url);
        }

        let text = response
            .text()
            .await
            .into_app_err_with(|| format!("reading metrics body from '{}'", self.url))?;

        log::debug!(target: LOG_TARGET, "Fetched {} bytes of exposition text", text.len());
        Ok(Snapshot::parse(&text))
    }
}
