pub mod anisearch;
pub mod fillerlist;
pub mod tvdb;

pub use anisearch::AniSearchClient;
pub use fillerlist::{FillerListClient, FillerSource};
pub use tvdb::TvdbClient;

use std::time::Duration;

use crate::constants::BROWSER_USER_AGENT;

/// Builds the pooled HTTP client shared by all scrape clients in a run.
///
/// # Errors
/// Returns an error if the underlying TLS backend cannot be initialized.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

/// Mandatory inter-request delay.
///
/// The external sources apply informal rate limits; the delay is awaited
/// after every outbound attempt, successful or not, so the request rate
/// stays under the configured ceiling regardless of how fast responses are
/// processed downstream.
#[derive(Debug, Clone)]
pub struct RequestPacer {
    delay: Duration,
}

impl RequestPacer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn pace(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// One paced GET. Returns the body on a 2xx response, `None` on anything
/// else; the delay is charged either way.
pub(crate) async fn fetch_page(
    client: &reqwest::Client,
    pacer: &RequestPacer,
    url: &str,
) -> Option<String> {
    let body = match client.get(url).send().await {
        Ok(response) if response.status().is_success() => response.text().await.ok(),
        Ok(response) => {
            tracing::debug!(url, status = %response.status(), "non-success response");
            None
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "request failed");
            None
        }
    };
    pacer.pace().await;
    body
}
