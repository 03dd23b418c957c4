//! Shared HTTP plumbing for the page fetchers.
//!
//! The portal is flaky: 5xx responses and dropped connections are routine.
//! Idempotent GETs retry with exponential backoff and jitter, bounded at
//! seven total attempts.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use tracing::warn;

use crate::fetch_error::FetchError;

pub(crate) fn default_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .expect("Failed to create HTTP client")
}

fn backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(800))
        .with_max_times(6)
        .with_jitter()
}

/// GET a page as text, retrying transient faults.
pub(crate) async fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    (|| async {
        let response = client.get(url).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(FetchError::ServerError(status.as_u16()));
        }
        Ok(response.text().await?)
    })
    .retry(backoff())
    .when(FetchError::is_transient)
    .notify(|err, delay| {
        warn!("Transient fetch error, retrying in {:?}: {}", delay, err);
    })
    .await
}
