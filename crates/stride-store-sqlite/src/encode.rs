//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings in UTC so that
//! string comparison in SQL matches chronological order. Dates are stored as
//! `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use stride_core::log::{CompiledLog, CompiledLogId, Entry};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn new_id() -> String { Uuid::new_v4().hyphenated().to_string() }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// An `entries` row as read from SQLite, before decoding.
pub struct RawEntry {
  pub user_id:    String,
  pub content:    String,
  pub created_at: String,
}

impl RawEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      content:    row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_entry(self) -> Result<Entry> {
    Ok(Entry {
      user_id:    self.user_id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A `compiled_logs` row as read from SQLite, before decoding.
pub struct RawCompiledLog {
  pub id:            String,
  pub user_id:       String,
  pub week_start:    String,
  pub markdown_blob: String,
  pub created_at:    String,
}

impl RawCompiledLog {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      user_id:       row.get(1)?,
      week_start:    row.get(2)?,
      markdown_blob: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_compiled_log(self) -> Result<CompiledLog> {
    Ok(CompiledLog {
      id:            CompiledLogId::new(self.id),
      user_id:       self.user_id,
      week_start:    decode_date(&self.week_start)?,
      markdown_blob: self.markdown_blob,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
