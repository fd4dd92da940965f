//! Backend forwarding: liveness probe plus the generation request.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default generation endpoint (Ollama-style API)
pub const DEFAULT_GENERATE_URL: &str = "http://localhost:11434/api/generate";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "llama3";

/// Backend connection settings
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Full URL of the generation endpoint
    pub generate_url: String,
    /// Model identifier sent with every generation request
    pub model: String,
    /// Bound on the reachability probe
    pub probe_timeout: Duration,
    /// Bound on the generation request, sized for slow generation
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            generate_url: DEFAULT_GENERATE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            probe_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl BackendConfig {
    /// URL probed for reachability: the backend root, without the API path
    pub fn probe_url(&self) -> String {
        self.generate_url
            .strip_suffix("/api/generate")
            .unwrap_or(&self.generate_url)
            .to_string()
    }
}

/// Terminal result of forwarding one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Backend produced generated text
    Success { text: String },
    /// Probe or transport failure; the backend never answered
    BackendUnreachable { detail: String },
    /// Backend answered with a non-success status
    BackendError { status: u16, body: String },
    /// Backend answered with success but the body had no usable output field
    MalformedResponse { body: String },
}

impl ForwardOutcome {
    /// Get the short status label for this outcome
    pub fn label(&self) -> &'static str {
        match self {
            ForwardOutcome::Success { .. } => "SUCCESS",
            ForwardOutcome::BackendUnreachable { .. } => "BACKEND_UNREACHABLE",
            ForwardOutcome::BackendError { .. } => "BACKEND_ERROR",
            ForwardOutcome::MalformedResponse { .. } => "MALFORMED_RESPONSE",
        }
    }
}

/// Generation request body
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// The slice of the generation response this filter reads
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// HTTP forwarder for prompts the policy allowed
pub struct Forwarder {
    config: BackendConfig,
    client: reqwest::Client,
}

impl Forwarder {
    /// Create a forwarder with its own HTTP client
    pub fn new(config: BackendConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { config, client })
    }

    /// Send one prompt to the backend and report the terminal outcome
    ///
    /// A short probe runs first so an absent backend surfaces quickly instead
    /// of waiting out the generation timeout. Every failure maps to an outcome
    /// variant; nothing here is fatal to the caller, and nothing is retried.
    pub async fn forward(&self, prompt: &str) -> ForwardOutcome {
        if let Err(e) = self.probe().await {
            warn!(url = %self.config.probe_url(), error = %e, "Backend probe failed");
            return ForwardOutcome::BackendUnreachable {
                detail: e.to_string(),
            };
        }

        let payload = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = match self
            .client
            .post(&self.config.generate_url)
            .json(&payload)
            .timeout(self.config.request_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Generation request failed");
                return ForwardOutcome::BackendUnreachable {
                    detail: e.to_string(),
                };
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to read backend response body");
                return ForwardOutcome::BackendUnreachable {
                    detail: e.to_string(),
                };
            }
        };

        if !status.is_success() {
            warn!(status = status.as_u16(), "Backend returned an error status");
            return ForwardOutcome::BackendError {
                status: status.as_u16(),
                body,
            };
        }

        match serde_json::from_str::<GenerateResponse>(&body) {
            Ok(GenerateResponse {
                response: Some(text),
            }) => {
                debug!(chars = text.len(), "Backend generation succeeded");
                ForwardOutcome::Success { text }
            }
            _ => {
                warn!("Backend response had no usable output field");
                ForwardOutcome::MalformedResponse { body }
            }
        }
    }

    /// Probe the backend root for reachability
    ///
    /// Any HTTP status counts as reachable; only transport failures matter.
    async fn probe(&self) -> Result<(), reqwest::Error> {
        self.client
            .get(self.config.probe_url())
            .timeout(self.config.probe_timeout)
            .send()
            .await
            .map(|_| ())
    }
}
