//! HTTP helpers for the account service JSON API. The session store goes
//! through [`ApiClient::post_json`] so every call shares the same URL handling,
//! user agent, optional timeout and error mapping. The helpers never log
//! request bodies; callers pass credentials and must keep them out of spans.

pub mod types;

use crate::{error::Error, APP_USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Maximum number of error detail characters surfaced to callers.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

/// Status and decoded body of a completed request. `body` is `None` when the
/// response was empty or not JSON.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The service's `detail` message, trimmed and truncated.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        error_detail(self.body.as_ref())
    }

    /// Decodes the body into `T`, returning `None` when absent or mismatched.
    #[must_use]
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::from_value(body.clone()).ok())
    }
}

impl ApiClient {
    /// Builds a client without a request timeout.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, None)
    }

    /// Builds a client that aborts requests after `timeout`.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL or the
    /// underlying HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        let base_url = validate_base_url(base_url)?;

        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| Error::Transport(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { base_url, client })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins the configured base URL and `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    /// Posts `body` as JSON and returns the status with the decoded body.
    /// Any HTTP status is returned as `Ok`; interpreting it is up to the caller.
    ///
    /// # Errors
    /// Returns [`Error::Transport`] when the request cannot be sent, times out,
    /// or the response body cannot be read.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, Error> {
        let url = self.url(path);

        let span = info_span!("api.post", http.method = "POST", url = %url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| Error::Transport(format!("Failed to read response: {err}")))?;

        debug!("{} - {}", url, status);

        Ok(ApiResponse {
            status,
            body: parse_body(&text),
        })
    }
}

fn validate_base_url(base_url: &str) -> Result<String, Error> {
    let trimmed = base_url.trim();
    let url = Url::parse(trimmed)
        .map_err(|err| Error::Transport(format!("Invalid service URL {trimmed}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(Error::Transport(format!(
                "Invalid service URL {trimmed}: unsupported scheme {scheme}"
            )))
        }
    }

    if url.host().is_none() {
        return Err(Error::Transport(format!(
            "Invalid service URL {trimmed}: no host specified"
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

fn map_request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Transport("Request timed out. Please try again.".to_string())
    } else {
        Error::Transport(format!("Unable to reach the server: {err}"))
    }
}

fn parse_body(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        serde_json::from_str(trimmed).ok()
    }
}

/// Extracts a `detail` string from an error payload. Non-string or blank
/// details yield `None` so callers fall back to their own message.
#[must_use]
pub fn error_detail(body: Option<&Value>) -> Option<String> {
    let detail = body?.get("detail")?.as_str()?.trim();
    if detail.is_empty() {
        None
    } else {
        Some(detail.chars().take(MAX_ERROR_CHARS).collect())
    }
}
