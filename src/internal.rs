//! Internal diagnostic call helper
//!
//! One outbound call to the internal service's diagnostic endpoint.
//! Failures are expected and frequent here (that is what the service
//! diagnoses), so every outcome is returned as an [`InternalCallResult`]
//! rather than propagated as an error.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Settings;

/// Outcome of a single internal call attempt. Never retried.
#[derive(Debug, Clone)]
pub struct InternalCallResult {
    pub target_url: String,
    pub succeeded: bool,
    pub body: Option<Value>,
    pub error: Option<String>,
}

impl InternalCallResult {
    fn success(target_url: String, body: Value) -> Self {
        Self {
            target_url,
            succeeded: true,
            body: Some(body),
            error: None,
        }
    }

    fn failure(target_url: String, error: String) -> Self {
        Self {
            target_url,
            succeeded: false,
            body: None,
            error: Some(error),
        }
    }
}

/// Client for the internal service's diagnostic endpoint
pub struct InternalClient {
    diagnostic_url: String,
}

impl InternalClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            diagnostic_url: settings.diagnostic_url(),
        }
    }

    /// Target URL of the diagnostic endpoint, without query parameters
    pub fn target_url(&self) -> &str {
        &self.diagnostic_url
    }

    /// Perform exactly one diagnostic call attempt.
    ///
    /// A fresh `reqwest::Client` is built for each invocation with connection
    /// pooling disabled and dropped on return, so no connection is ever
    /// reused across attempts. A kept-alive connection would pin a single
    /// backend replica and make the load-balancing probe report a false
    /// negative.
    pub async fn call_diagnostic(&self, fib: Option<u64>, timeout: Duration) -> InternalCallResult {
        let client = match Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                return InternalCallResult::failure(
                    self.diagnostic_url.clone(),
                    format!("Failed to build HTTP client: {}", e),
                )
            }
        };

        let mut request = client.get(&self.diagnostic_url);
        if let Some(n) = fib {
            request = request.query(&[("fib", n)]);
        }

        debug!(url = %self.diagnostic_url, fib = ?fib, "Calling internal diagnostic endpoint");

        match request.send().await {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => InternalCallResult::success(self.diagnostic_url.clone(), body),
                Err(e) => {
                    warn!(url = %self.diagnostic_url, error = %e, "Internal response was not JSON");
                    InternalCallResult::failure(
                        self.diagnostic_url.clone(),
                        format!("Failed to parse response as JSON: {}", e),
                    )
                }
            },
            Err(e) => {
                warn!(url = %self.diagnostic_url, error = %e, "Internal call failed");
                InternalCallResult::failure(self.diagnostic_url.clone(), e.to_string())
            }
        }
    }
}
