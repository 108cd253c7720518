//! Error type for `stride-gemini`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("gemini api error {status}: {body}")]
  Api { status: u16, body: String },

  #[error("gemini api rate limit exceeded: {body}")]
  RateLimited { body: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
