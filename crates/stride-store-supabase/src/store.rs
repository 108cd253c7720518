//! [`SupabaseStore`] — the PostgREST implementation of [`EntryStore`].

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response};
use stride_core::{
  log::{CompiledLog, Entry, NewCompiledLog},
  store::EntryStore,
};

use crate::{Error, Result};

const ENTRY_COLUMNS: &str = "user_id,content,created_at";
const LOG_COLUMNS: &str = "id,user_id,week_start,markdown_blob,created_at";

/// Connection settings for a Supabase project.
#[derive(Clone)]
pub struct SupabaseConfig {
  /// Project URL, e.g. `https://abc.supabase.co`.
  pub url:         String,
  pub service_key: String,
}

/// Entry store backed by a Supabase project's REST interface.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SupabaseStore {
  client: Client,
  config: SupabaseConfig,
}

impl SupabaseStore {
  pub fn new(config: SupabaseConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, table: &str) -> String {
    format!("{}/rest/v1/{}", self.config.url.trim_end_matches('/'), table)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    req
      .header("apikey", &self.config.service_key)
      .bearer_auth(&self.config.service_key)
  }
}

/// Turn a non-2xx response into [`Error::Api`].
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Api {
    status: status.as_u16(),
    body,
  })
}

// ─── EntryStore impl ─────────────────────────────────────────────────────────

impl EntryStore for SupabaseStore {
  type Error = Error;

  /// `GET /rest/v1/entries?user_id=eq.<id>&created_at=gte.<since>`
  async fn entries_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<Vec<Entry>> {
    let resp = self
      .auth(self.client.get(self.url("entries")))
      .query(&[
        ("select", ENTRY_COLUMNS.to_owned()),
        ("user_id", format!("eq.{user_id}")),
        (
          "created_at",
          format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ),
      ])
      .send()
      .await?;

    let entries: Vec<Entry> = check(resp).await?.json().await?;
    tracing::debug!(count = entries.len(), "fetched entries from supabase");
    Ok(entries)
  }

  /// `POST /rest/v1/compiled_logs?on_conflict=user_id,week_start` with
  /// `Prefer: resolution=merge-duplicates`.
  async fn upsert_compiled_log(&self, log: NewCompiledLog) -> Result<CompiledLog> {
    let resp = self
      .auth(self.client.post(self.url("compiled_logs")))
      .query(&[("on_conflict", "user_id,week_start"), ("select", LOG_COLUMNS)])
      .header("Prefer", "resolution=merge-duplicates,return=representation")
      .json(&[log])
      .send()
      .await?;

    let rows: Vec<CompiledLog> = check(resp).await?.json().await?;
    rows
      .into_iter()
      .next()
      .ok_or(Error::EmptyResponse("compiled_logs upsert"))
  }

  /// `GET /rest/v1/compiled_logs?user_id=eq.<id>&order=week_start.desc`
  async fn list_compiled_logs(&self, user_id: &str) -> Result<Vec<CompiledLog>> {
    let resp = self
      .auth(self.client.get(self.url("compiled_logs")))
      .query(&[
        ("select", LOG_COLUMNS.to_owned()),
        ("user_id", format!("eq.{user_id}")),
        ("order", "week_start.desc".to_owned()),
      ])
      .send()
      .await?;

    Ok(check(resp).await?.json().await?)
  }
}
