use crate::{api::ApiClient, session::SessionStore};
use anyhow::Result;
use std::time::Duration;

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub url: String,
    pub timeout: Option<Duration>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self { url, timeout: None }
    }

    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        // 0 disables the timeout
        self.timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        self
    }

    /// Builds a fresh, logged-out session store for the configured service.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn session_store(&self) -> Result<SessionStore> {
        let client = ApiClient::with_timeout(&self.url, self.timeout)?;
        Ok(SessionStore::new(client))
    }
}
