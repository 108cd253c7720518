//! The `EntryStore` trait.
//!
//! The trait is implemented by storage backends (`stride-store-sqlite`,
//! `stride-store-supabase`). Higher layers depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::log::{CompiledLog, Entry, NewCompiledLog};

/// Abstraction over the datastore holding raw entries and compiled logs.
///
/// Entries are read-only from this trait's point of view. Compiled logs are
/// keyed by `(user_id, week_start)`.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait EntryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All entries for `user_id` with `created_at >= since`, in whatever order
  /// the backend returns them.
  fn entries_since<'a>(
    &'a self,
    user_id: &'a str,
    since: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Entry>, Self::Error>> + Send + 'a;

  /// Insert the log, or overwrite `markdown_blob` and `created_at` of the
  /// existing row with the same `(user_id, week_start)`.
  ///
  /// An existing row keeps its identifier; a new row gets one assigned by the
  /// store. The returned [`CompiledLog`] reflects the stored row.
  fn upsert_compiled_log(
    &self,
    log: NewCompiledLog,
  ) -> impl Future<Output = Result<CompiledLog, Self::Error>> + Send + '_;

  /// All compiled logs for `user_id`, newest week first.
  fn list_compiled_logs<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<CompiledLog>, Self::Error>> + Send + 'a;
}
