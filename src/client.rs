use std::time::{Duration, Instant};

use futures::StreamExt;
use reqwest::multipart;
use reqwest::Client;

use crate::error::{DesignError, Result};
use crate::stream::consume_stream;
use crate::transform::build_design_result;
use crate::types::{DesignResult, GenerationRequest, StreamingProgressEvent};

fn normalize(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Async client for the Interior Designer service.
///
/// Submits a room photo plus preferences as one multipart request and
/// consumes the streamed response incrementally, invoking a progress
/// callback for every server update until a terminal frame arrives.
///
/// # Example
/// ```no_run
/// use roomdesigner_rs::{DesignClient, GenerationRequest};
///
/// # async fn example() -> roomdesigner_rs::Result<()> {
/// let client = DesignClient::new("http://127.0.0.1:8009");
/// let request = GenerationRequest::new(800.0, "scandinavian")
///     .with_image(std::fs::read("room.jpg").unwrap());
/// let result = client
///     .generate_design(&request, |ev| println!("{}", ev.message))
///     .await?;
/// println!("{} products", result.products.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DesignClient {
    http: Client,
    endpoint: String,
    idle_timeout: Duration,
}

impl DesignClient {
    /// Create a new client pointing at the given designer endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: normalize(endpoint.into()),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Use a custom `reqwest::Client` (for connection pooling, timeouts, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Maximum time to wait for the next chunk before the attempt fails
    /// with [`DesignError::Timeout`]. Defaults to 60 seconds.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the configured per-chunk idle timeout.
    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    // ── Health ──────────────────────────────────────────────────────

    /// Check whether the designer service is reachable via `/health`.
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.endpoint);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| DesignError::Network {
                context: format!(
                    "Cannot connect to designer service at {} \u{2014} is it running?",
                    self.endpoint
                ),
                source: e,
            })?;
        Ok(resp.status().is_success())
    }

    // ── Generation ──────────────────────────────────────────────────

    /// Submit one generation attempt and stream it to completion.
    ///
    /// `on_progress` is invoked synchronously for each progress frame, in
    /// arrival order, and must not block; the next chunk is not read until
    /// it returns. The first completed frame wins; the stream is drained to
    /// completion afterwards so the connection is never left half-read.
    ///
    /// Fails with [`DesignError::Validation`] (before any network call) when
    /// the request has no images, [`DesignError::Remote`] on a server error
    /// frame, and [`DesignError::MissingResult`] when the stream ends without
    /// a completed frame.
    pub async fn generate_design<F>(
        &self,
        request: &GenerationRequest,
        on_progress: F,
    ) -> Result<DesignResult>
    where
        F: FnMut(StreamingProgressEvent),
    {
        if request.images.is_empty() {
            return Err(DesignError::Validation(
                "At least one room image is required".to_string(),
            ));
        }

        let submitted_at = Instant::now();

        // Only the primary image is uploaded; the preferences ride along as
        // a JSON-encoded form field.
        let image_part = multipart::Part::bytes(request.images[0].clone())
            .file_name("room.png")
            .mime_str("image/png")
            .map_err(|e| DesignError::Network {
                context: "Failed to build multipart body".to_string(),
                source: e,
            })?;
        let preferences = serde_json::to_string(&request.preferences_json())?;
        let form = multipart::Form::new()
            .part("image", image_part)
            .text("preferences", preferences);

        let url = format!("{}/generate-design", self.endpoint);
        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DesignError::Network {
                context: format!(
                    "Cannot connect to designer service at {} \u{2014} is it running?",
                    self.endpoint
                ),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(DesignError::Http { status, body });
        }

        let stream = resp.bytes_stream().map(|chunk| {
            chunk.map_err(|e| DesignError::Network {
                context: "Failed reading the design stream".to_string(),
                source: e,
            })
        });

        let payload = consume_stream(stream, self.idle_timeout, on_progress).await?;
        Ok(build_design_result(&payload, request, submitted_at))
    }
}
