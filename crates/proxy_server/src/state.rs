use std::time::Duration;

use reqwest::Client;

/// Shared by every worker. The proxy keeps no per-request state.
pub struct AppState {
    pub client: Client,
}

impl AppState {
    /// `request_timeout` bounds a whole upstream exchange, streamed body included.
    pub fn new(request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}
