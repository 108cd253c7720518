//! Error types for `stride-core`.

use chrono::NaiveDate;
use thiserror::Error;

/// A boxed error from an external collaborator (store or summarizer).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can go wrong while compiling a weekly log.
///
/// Each variant corresponds to exactly one stage of the compilation; the
/// underlying message of the failing collaborator is preserved in `Display`.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("Failed to fetch raw entries: {0}")]
  Fetch(#[source] BoxError),

  #[error("No entries found for user {user_id} this week (starting {week_start}).")]
  NoEntries {
    user_id:    String,
    week_start: NaiveDate,
  },

  #[error("AI response was blocked due to safety concerns. Feedback: {feedback}")]
  Blocked { feedback: String },

  #[error("Failed to compile log with AI: {0}")]
  Generation(#[source] BoxError),

  #[error("Failed to save compiled log: {0}")]
  Persist(#[source] BoxError),
}

impl CompileError {
  /// `true` if the failure means "nothing to compile" rather than a fault.
  pub fn is_not_found(&self) -> bool { matches!(self, Self::NoEntries { .. }) }
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
