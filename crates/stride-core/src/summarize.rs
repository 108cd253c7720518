//! The `Summarizer` trait — the seam to the text generation service.

use std::future::Future;

/// Sampling parameters passed along with every prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
  pub temperature:       f32,
  pub max_output_tokens: u32,
}

/// The outcome of a generation call that reached the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
  /// Generated text, untrimmed.
  Text(String),
  /// The service returned no content, typically because a safety filter
  /// blocked the prompt. `feedback` is whatever metadata the service offered.
  Blocked { feedback: String },
}

/// Abstraction over a remote text generation API.
pub trait Summarizer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Generate text for `prompt`. Transport, quota and decoding failures are
  /// errors; an empty or blocked response is [`Generation::Blocked`].
  fn generate<'a>(
    &'a self,
    prompt: &'a str,
    params: GenerationParams,
  ) -> impl Future<Output = Result<Generation, Self::Error>> + Send + 'a;
}
