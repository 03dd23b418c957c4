#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server error (HTTP {0})")]
    ServerError(u16),
}

impl FetchError {
    /// Transient faults worth retrying: transport errors and 5xx responses.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Request(_) | FetchError::ServerError(_))
    }
}
