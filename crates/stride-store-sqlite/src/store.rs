//! [`SqliteStore`] — the SQLite implementation of [`EntryStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use stride_core::{
  log::{CompiledLog, Entry, NewCompiledLog},
  store::EntryStore,
};

use crate::{
  Result,
  encode::{RawCompiledLog, RawEntry, encode_date, encode_dt, new_id},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Stride entry store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a raw journal entry.
  ///
  /// Entries are normally written by the client application directly; this
  /// exists for local development and tests.
  pub async fn record_entry(
    &self,
    user_id: &str,
    content: &str,
    created_at: DateTime<Utc>,
  ) -> Result<Entry> {
    let entry = Entry {
      user_id: user_id.to_owned(),
      content: content.to_owned(),
      created_at,
    };

    let id_str      = new_id();
    let user_str    = entry.user_id.clone();
    let content_str = entry.content.clone();
    let at_str      = encode_dt(created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO entries (entry_id, user_id, content, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, user_str, content_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }
}

// ─── EntryStore impl ─────────────────────────────────────────────────────────

impl EntryStore for SqliteStore {
  type Error = crate::Error;

  async fn entries_since(
    &self,
    user_id: &str,
    since: DateTime<Utc>,
  ) -> Result<Vec<Entry>> {
    let user_str  = user_id.to_owned();
    let since_str = encode_dt(since);

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, content, created_at FROM entries
           WHERE user_id = ?1 AND created_at >= ?2
           ORDER BY created_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, since_str], RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn upsert_compiled_log(&self, log: NewCompiledLog) -> Result<CompiledLog> {
    let id_str       = new_id();
    let user_str     = log.user_id;
    let week_str     = encode_date(log.week_start);
    let markdown_str = log.markdown_blob;
    let at_str       = encode_dt(log.created_at);

    // The UNIQUE (user_id, week_start) constraint makes this a single atomic
    // upsert; on conflict the existing row keeps its id.
    let raw: RawCompiledLog = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO compiled_logs (id, user_id, week_start, markdown_blob, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (user_id, week_start) DO UPDATE SET
             markdown_blob = excluded.markdown_blob,
             created_at    = excluded.created_at
           RETURNING id, user_id, week_start, markdown_blob, created_at",
          rusqlite::params![id_str, user_str, week_str, markdown_str, at_str],
          RawCompiledLog::from_row,
        )?)
      })
      .await?;

    raw.into_compiled_log()
  }

  async fn list_compiled_logs(&self, user_id: &str) -> Result<Vec<CompiledLog>> {
    let user_str = user_id.to_owned();

    let raws: Vec<RawCompiledLog> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, user_id, week_start, markdown_blob, created_at
           FROM compiled_logs WHERE user_id = ?1
           ORDER BY week_start DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawCompiledLog::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCompiledLog::into_compiled_log).collect()
  }
}
