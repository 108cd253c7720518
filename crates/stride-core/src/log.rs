//! Raw journal entries and the compiled weekly logs derived from them.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single raw journal entry. Entries are immutable and owned by the store;
/// the compiler only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
  pub user_id:    String,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

/// Store-assigned identifier of a [`CompiledLog`].
///
/// Opaque to the compiler: some backends hand out UUIDs, others integers.
/// Both deserialise into the same string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawLogId", into = "String")]
pub struct CompiledLogId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLogId {
  Text(String),
  Int(i64),
}

impl From<RawLogId> for CompiledLogId {
  fn from(raw: RawLogId) -> Self {
    match raw {
      RawLogId::Text(s) => Self(s),
      RawLogId::Int(n) => Self(n.to_string()),
    }
  }
}

impl From<CompiledLogId> for String {
  fn from(id: CompiledLogId) -> Self { id.0 }
}

impl CompiledLogId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for CompiledLogId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// The synthesized markdown summary for one user's one week.
///
/// At most one row exists per `(user_id, week_start)`; recompiling a week
/// overwrites `markdown_blob` and `created_at` in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledLog {
  pub id:            CompiledLogId,
  pub user_id:       String,
  /// Monday of the ISO week this log covers.
  pub week_start:    NaiveDate,
  pub markdown_blob: String,
  /// Time of the most recent compilation.
  pub created_at:    DateTime<Utc>,
}

/// Input to [`EntryStore::upsert_compiled_log`](crate::store::EntryStore::upsert_compiled_log).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCompiledLog {
  pub user_id:       String,
  pub week_start:    NaiveDate,
  pub markdown_blob: String,
  pub created_at:    DateTime<Utc>,
}
