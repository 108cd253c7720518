//! Error type for `stride-store-supabase`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// PostgREST rejected the request; `body` is its JSON error document.
  #[error("supabase error {status}: {body}")]
  Api { status: u16, body: String },

  #[error("supabase returned no row for {0}")]
  EmptyResponse(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
