//! [`WeeklyLogCompiler`] — fetch, combine, prompt, generate, upsert.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  error::{CompileError, Result},
  log::NewCompiledLog,
  prompt::{WEEKLY_GENERATION_PARAMS, build_prompt, combine_entries},
  store::EntryStore,
  summarize::{Generation, Summarizer},
  week::{week_start, week_start_instant},
};

/// Message returned alongside every successful compilation.
pub const SUCCESS_MESSAGE: &str = "Weekly log compiled and saved successfully!";

/// Result of a successful [`WeeklyLogCompiler::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileReport {
  pub message:            String,
  pub compiled_log_id:    String,
  pub formatted_markdown: String,
}

/// Compiles a user's entries for the current week into one markdown log.
///
/// Holds the store and summarizer that were constructed at startup. Each call
/// to [`compile`](Self::compile) makes three sequential external calls and
/// keeps no state between calls.
pub struct WeeklyLogCompiler<S, G> {
  store:      Arc<S>,
  summarizer: Arc<G>,
}

impl<S, G> Clone for WeeklyLogCompiler<S, G> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      summarizer: Arc::clone(&self.summarizer),
    }
  }
}

impl<S, G> WeeklyLogCompiler<S, G>
where
  S: EntryStore,
  G: Summarizer,
{
  pub fn new(store: Arc<S>, summarizer: Arc<G>) -> Self { Self { store, summarizer } }

  /// Compile the week containing `now` for `user_id`.
  ///
  /// Fails without calling the summarizer when the week has no entries, and
  /// without writing to the store when generation fails or is blocked.
  pub async fn compile(
    &self,
    user_id: &str,
    now: DateTime<Utc>,
  ) -> Result<CompileReport> {
    let week_start = week_start(now.date_naive());
    tracing::info!(%user_id, %week_start, "compiling weekly log");

    let entries = self
      .store
      .entries_since(user_id, week_start_instant(week_start))
      .await
      .map_err(|e| {
        tracing::error!(error = %e, "failed to fetch raw entries");
        CompileError::Fetch(Box::new(e))
      })?;
    tracing::info!(count = entries.len(), "found raw entries for the week");

    if entries.is_empty() {
      return Err(CompileError::NoEntries {
        user_id: user_id.to_owned(),
        week_start,
      });
    }

    let prompt = build_prompt(week_start, &combine_entries(&entries));

    let generation = self
      .summarizer
      .generate(&prompt, WEEKLY_GENERATION_PARAMS)
      .await
      .map_err(|e| {
        tracing::error!(error = %e, "text generation failed");
        CompileError::Generation(Box::new(e))
      })?;

    let markdown = match generation {
      Generation::Text(text) => text.trim().to_owned(),
      Generation::Blocked { feedback } => {
        tracing::warn!(%feedback, "generation was blocked or empty");
        return Err(CompileError::Blocked { feedback });
      }
    };
    tracing::info!(len = markdown.len(), "received formatted markdown");

    let stored = self
      .store
      .upsert_compiled_log(NewCompiledLog {
        user_id: user_id.to_owned(),
        week_start,
        markdown_blob: markdown.clone(),
        created_at: now,
      })
      .await
      .map_err(|e| {
        tracing::error!(error = %e, "failed to save compiled log");
        CompileError::Persist(Box::new(e))
      })?;
    tracing::info!(compiled_log_id = %stored.id, "saved compiled log");

    Ok(CompileReport {
      message:            SUCCESS_MESSAGE.to_owned(),
      compiled_log_id:    stored.id.to_string(),
      formatted_markdown: markdown,
    })
  }
}
