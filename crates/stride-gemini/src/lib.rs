//! Gemini backend for the Stride [`Summarizer`] trait.
//!
//! Calls the `generateContent` REST method of the Generative Language API.
//! A response without any text parts (typically a prompt blocked by a safety
//! filter) is reported as [`Generation::Blocked`] together with the prompt
//! feedback the API returned.

mod wire;

pub mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{Client, StatusCode};
use stride_core::summarize::{Generation, GenerationParams, Summarizer};

use wire::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

/// Default Generative Language API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for weekly summaries.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Connection settings for the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
  pub api_key:  String,
  pub model:    String,
  /// Overridable so tests can point the client at a mock server.
  pub base_url: String,
}

impl GeminiConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:  api_key.into(),
      model:    DEFAULT_MODEL.to_owned(),
      base_url: DEFAULT_BASE_URL.to_owned(),
    }
  }
}

/// Async client for Gemini text generation.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GeminiClient {
  client: Client,
  config: GeminiConfig,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(120))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, method: &str) -> String {
    format!(
      "{}/models/{}:{}",
      self.config.base_url.trim_end_matches('/'),
      self.config.model,
      method
    )
  }
}

impl Summarizer for GeminiClient {
  type Error = Error;

  async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<Generation> {
    let request = GenerateContentRequest {
      contents:          vec![Content {
        role:  Some("user".to_owned()),
        parts: vec![Part {
          text: Some(prompt.to_owned()),
        }],
      }],
      generation_config: GenerationConfig {
        temperature:       params.temperature,
        max_output_tokens: params.max_output_tokens,
      },
    };

    tracing::debug!(
      model = %self.config.model,
      prompt_len = prompt.len(),
      "sending generateContent request"
    );

    let resp = self
      .client
      .post(self.url("generateContent"))
      .header("x-goog-api-key", &self.config.api_key)
      .json(&request)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited { body });
      }
      return Err(Error::Api {
        status: status.as_u16(),
        body,
      });
    }

    let body: GenerateContentResponse = resp.json().await?;
    Ok(body.into_generation())
  }
}
