//! Retrying HTTP client
//!
//! The import API is the only HTTP surface of the tap, so this client does
//! one thing: POST a JSON body, retrying transient failures with backoff.
//! 429 honors `retry-after`; other 4xx statuses surface immediately with
//! the response body.

use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// How failed requests are retried
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts after the first request
    pub max_retries: u32,
    /// Smallest wait between attempts
    pub min_backoff: Duration,
    /// Largest wait between attempts
    pub max_backoff: Duration,
    /// How the wait grows per attempt
    pub backoff: BackoffType,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            min_backoff: Duration::from_secs(3),
            max_backoff: Duration::from_secs(60),
            backoff: BackoffType::Exponential,
        }
    }
}

impl RetryPolicy {
    /// The wait before retry number `attempt`
    pub fn wait_for(&self, attempt: u32) -> Duration {
        let wait = match self.backoff {
            BackoffType::Constant => self.min_backoff,
            BackoffType::Linear => self.min_backoff * (attempt + 1),
            BackoffType::Exponential => self.min_backoff * 2u32.saturating_pow(attempt),
        };
        wait.clamp(self.min_backoff, self.max_backoff)
    }
}

/// JSON POST client with bounded retry
pub struct HttpClient {
    inner: reqwest::Client,
    bearer_token: Option<String>,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Build a client; `bearer_token`, when set, goes out on every request
    pub fn new(bearer_token: Option<String>, retry: RetryPolicy) -> Self {
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("vitess-tap/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner,
            bearer_token,
            retry,
        }
    }

    /// POST a JSON body, retrying transient failures
    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Response> {
        let mut attempt = 0;

        loop {
            let mut request = self.inner.post(url).json(body);
            if let Some(token) = &self.bearer_token {
                request = request.bearer_auth(token);
            }

            let outcome = match request.send().await {
                Ok(response) => self.classify(response, attempt).await?,
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.retry.max_retries => {
                    Outcome::Retry {
                        wait: self.retry.wait_for(attempt),
                        why: format!("transient network error: {e}"),
                    }
                }
                Err(e) => return Err(Error::Http(e)),
            };

            match outcome {
                Outcome::Done(response) => {
                    debug!("POST {url} succeeded");
                    return Ok(response);
                }
                Outcome::Retry { wait, why } => {
                    warn!(
                        "POST {url} failed ({why}), attempt {}/{}, retrying in {wait:?}",
                        attempt + 1,
                        self.retry.max_retries + 1
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn classify(&self, response: Response, attempt: u32) -> Result<Outcome> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            if attempt >= self.retry.max_retries {
                return Err(Error::http_status(429, "rate limited"));
            }
            let wait = retry_after(&response).max(self.retry.min_backoff);
            return Ok(Outcome::Retry {
                wait,
                why: "rate limited".to_string(),
            });
        }

        if status.is_server_error() && attempt < self.retry.max_retries {
            return Ok(Outcome::Retry {
                wait: self.retry.wait_for(attempt),
                why: format!("server returned {}", status.as_u16()),
            });
        }

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        Ok(Outcome::Done(response))
    }
}

enum Outcome {
    Done(Response),
    Retry { wait: Duration, why: String },
}

/// The server-requested wait, when the 429 carries one
fn retry_after(response: &Response) -> Duration {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .map_or(Duration::from_secs(60), Duration::from_secs)
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("retry", &self.retry)
            .field("has_bearer_token", &self.bearer_token.is_some())
            .finish_non_exhaustive()
    }
}
