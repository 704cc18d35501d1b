//! Hosted generative-model client.
//!
//! One reqwest-backed client implements both trait seams: `LlmClient` for
//! text-only pricing calls and `VisionClient` for image-bearing detection
//! calls. The traits exist so the detector and estimator can be exercised
//! with substitutable fakes — clients are constructed once at startup and
//! passed in explicitly, never reached through globals.

use serde::{Deserialize, Serialize};

use super::QuoteError;

/// Text generation seam used by the price estimator.
pub trait LlmClient: Send + Sync {
    /// Send a text prompt, expecting a JSON-bearing text reply.
    fn generate(&self, model: &str, prompt: &str) -> Result<String, QuoteError>;
}

/// Vision generation seam used by the item detector.
pub trait VisionClient: Send + Sync {
    /// Send a prompt plus one inline base64 image.
    fn generate_with_image(
        &self,
        model: &str,
        prompt: &str,
        image_b64: &str,
        mime: &str,
    ) -> Result<String, QuoteError>;
}

/// HTTP client for the hosted model API (`generateContent`-style REST).
pub struct HostedModelClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HostedModelClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    fn call(&self, model: &str, body: &GenerateRequest) -> Result<String, QuoteError> {
        let response = self
            .client
            .post(self.generate_url(model))
            .json(body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    QuoteError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    QuoteError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    QuoteError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QuoteError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| QuoteError::JsonParsing(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| QuoteError::SchemaMismatch("response carried no text part".into()))
    }
}

impl LlmClient for HostedModelClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, QuoteError> {
        let body = GenerateRequest::text(prompt);
        self.call(model, &body)
    }
}

impl VisionClient for HostedModelClient {
    fn generate_with_image(
        &self,
        model: &str,
        prompt: &str,
        image_b64: &str,
        mime: &str,
    ) -> Result<String, QuoteError> {
        let body = GenerateRequest::with_image(prompt, image_b64, mime);
        self.call(model, &body)
    }
}

// ──────────────────────────────────────────────
// Wire types
// ──────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

impl GenerateRequest {
    fn text(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }

    fn with_image(prompt: &str, image_b64: &str, mime: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(prompt.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime.to_string(),
                            data: image_b64.to_string(),
                        }),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

// ──────────────────────────────────────────────
// Mocks (testing)
// ──────────────────────────────────────────────

use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock LLM client — returns a configurable response or error.
pub struct MockLlmClient {
    response: Result<String, String>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, _prompt: &str) -> Result<String, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(QuoteError::HttpClient(message.clone())),
        }
    }
}

/// Mock vision client — returns a configurable response and counts calls,
/// so retry tests can assert an equivalent request was re-issued.
pub struct MockVisionClient {
    response: Result<String, String>,
    calls: AtomicUsize,
}

impl MockVisionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VisionClient for MockVisionClient {
    fn generate_with_image(
        &self,
        _model: &str,
        _prompt: &str,
        _image_b64: &str,
        _mime: &str,
    ) -> Result<String, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(QuoteError::Connection(message.clone())),
        }
    }
}
