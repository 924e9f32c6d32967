// Transport for the Gemini `generateContent` endpoint.
//
// The HTTP exchange sits behind `GenerativeBackend` so the retry protocol in
// `labeler` can be driven by a scripted backend. Interpreting a response is
// the pure `classify_response`.

use crate::config::GeminiConfig;
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Wait applied to a 429 whose body carries no usable retry hint.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// The request never produced an HTTP response (connect, timeout, body read).
#[derive(Debug, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    // The request URL carries the API key
    fn from(e: reqwest::Error) -> Self {
        Self(e.without_url().to_string())
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Send one prompt, returning whatever the server answered.
    async fn generate(&self, prompt: &str) -> Result<RawResponse, TransportError>;
}

/// What the labeler should do with a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// 200 with generated text (trimmed).
    Success(String),
    /// 429; wait this long before the next attempt.
    RetryAfter(Duration),
    /// 200 whose body has no generated text. Retried like a transport failure.
    Malformed,
    /// Any other status. The call is abandoned.
    Abort,
}

/// Decide how to proceed from a response's status and body.
pub fn classify_response(status: u16, body: &str) -> ResponseOutcome {
    match status {
        200 => match extract_text(body) {
            Some(text) => ResponseOutcome::Success(text.trim().to_string()),
            None => ResponseOutcome::Malformed,
        },
        429 => ResponseOutcome::RetryAfter(retry_delay(body).unwrap_or(DEFAULT_RETRY_DELAY)),
        _ => ResponseOutcome::Abort,
    }
}

/// Text of the first part of the first candidate.
fn extract_text(body: &str) -> Option<String> {
    let response: GenerateResponse = serde_json::from_str(body).ok()?;
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

/// Server-suggested wait from a 429 body:
/// `{"error": {"details": [..., {"retryDelay": "2s"}]}}`.
///
/// The last detail carrying a `retryDelay` wins.
fn retry_delay(body: &str) -> Option<Duration> {
    static SECONDS: OnceLock<Regex> = OnceLock::new();
    let re = SECONDS.get_or_init(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)s\s*$").expect("valid regex"));

    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let hint = value["error"]["details"]
        .as_array()?
        .iter()
        .rev()
        .find_map(|d| d["retryDelay"].as_str())?;

    let secs: f64 = re.captures(hint)?[1].parse().ok()?;
    // Out-of-range hints fall back to the default
    Duration::try_from_secs_f64(secs).ok()
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini HTTP client. One instance is reused for every labeling call.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        tracing::debug!(model = %config.model, base = %config.api_base, "Configured Gemini client");
        Ok(Self {
            client,
            endpoint: config.endpoint_url(),
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<RawResponse, TransportError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
