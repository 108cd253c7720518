//! JSON HTTP API for Stride.
//!
//! Exposes an axum [`Router`] backed by any [`EntryStore`] and [`Summarizer`].
//! CORS, tracing and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = stride_api::api_router(ApiState::new(store, summarizer));
//! ```

pub mod compile;
pub mod error;
pub mod history;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stride_core::{WeeklyLogCompiler, store::EntryStore, summarize::Summarizer};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S, G> {
  pub store:    Arc<S>,
  pub compiler: WeeklyLogCompiler<S, G>,
}

impl<S, G> Clone for ApiState<S, G> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      compiler: self.compiler.clone(),
    }
  }
}

impl<S, G> ApiState<S, G>
where
  S: EntryStore,
  G: Summarizer,
{
  pub fn new(store: Arc<S>, summarizer: Arc<G>) -> Self {
    Self {
      compiler: WeeklyLogCompiler::new(store.clone(), summarizer),
      store,
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, G>(state: ApiState<S, G>) -> Router<()>
where
  S: EntryStore + 'static,
  G: Summarizer + 'static,
{
  Router::new()
    .route("/", get(compile::root))
    .route("/compile-weekly-log/", post(compile::compile_weekly_log::<S, G>))
    .route("/compiled-logs", get(history::list::<S, G>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{DateTime, Utc};
  use serde_json::{Value, json};
  use stride_core::{
    log::{CompiledLog, Entry, NewCompiledLog},
    summarize::{Generation, GenerationParams},
  };
  use stride_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  #[derive(Debug, thiserror::Error)]
  #[error("{0}")]
  struct StubError(&'static str);

  /// Replies with a fixed outcome, never touching the network.
  enum StubSummarizer {
    Text(&'static str),
    Blocked,
    Fail,
  }

  impl Summarizer for StubSummarizer {
    type Error = StubError;

    async fn generate(
      &self,
      _prompt: &str,
      _params: GenerationParams,
    ) -> Result<Generation, StubError> {
      match self {
        Self::Text(t) => Ok(Generation::Text((*t).to_owned())),
        Self::Blocked => Ok(Generation::Blocked {
          feedback: "block_reason: SAFETY".into(),
        }),
        Self::Fail => Err(StubError("upstream timed out")),
      }
    }
  }

  /// Delegates to SQLite, but fails reads or writes on demand.
  struct FailingStore {
    inner:        SqliteStore,
    fail_reads:   bool,
    fail_upserts: bool,
  }

  impl EntryStore for FailingStore {
    type Error = StubError;

    async fn entries_since(
      &self,
      user_id: &str,
      since: DateTime<Utc>,
    ) -> Result<Vec<Entry>, StubError> {
      if self.fail_reads {
        return Err(StubError("connection refused"));
      }
      Ok(self.inner.entries_since(user_id, since).await.unwrap())
    }

    async fn upsert_compiled_log(&self, log: NewCompiledLog) -> Result<CompiledLog, StubError> {
      if self.fail_upserts {
        return Err(StubError("disk full"));
      }
      Ok(self.inner.upsert_compiled_log(log).await.unwrap())
    }

    async fn list_compiled_logs(&self, user_id: &str) -> Result<Vec<CompiledLog>, StubError> {
      Ok(self.inner.list_compiled_logs(user_id).await.unwrap())
    }
  }

  async fn failing_state(
    fail_reads: bool,
    fail_upserts: bool,
  ) -> (ApiState<FailingStore, StubSummarizer>, SqliteStore) {
    let inner = SqliteStore::open_in_memory().await.unwrap();
    inner.record_entry("u1", "note", Utc::now()).await.unwrap();
    let store = FailingStore {
      inner: inner.clone(),
      fail_reads,
      fail_upserts,
    };
    let state = ApiState::new(Arc::new(store), Arc::new(StubSummarizer::Text("summary")));
    (state, inner)
  }

  async fn make_state(
    summarizer: StubSummarizer,
  ) -> (ApiState<SqliteStore, StubSummarizer>, SqliteStore) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let state = ApiState::new(Arc::new(store.clone()), Arc::new(summarizer));
    (state, store)
  }

  async fn send<S: EntryStore + 'static>(
    state: ApiState<S, StubSummarizer>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  fn compile_body(user: &str) -> Option<Value> { Some(json!({ "user_id": user })) }

  // ── Liveness ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_returns_liveness_message() {
    let (state, _) = make_state(StubSummarizer::Text("unused")).await;
    let (status, body) = send(state, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body["message"],
      "Hello, Stride Backend! Ready for action with Gemini."
    );
  }

  // ── Compile ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn compile_returns_report_and_persists() {
    let (state, store) = make_state(StubSummarizer::Text("\n## Week\n- did things\n")).await;
    store.record_entry("u1", "did things", Utc::now()).await.unwrap();

    let (status, body) =
      send(state, "POST", "/compile-weekly-log/", compile_body("u1")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], stride_core::compiler::SUCCESS_MESSAGE);
    assert_eq!(body["formatted_markdown"], "## Week\n- did things");

    let logs = store.list_compiled_logs("u1").await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(body["compiled_log_id"], logs[0].id.as_str());
  }

  #[tokio::test]
  async fn recompile_keeps_the_same_id() {
    let (state, store) = make_state(StubSummarizer::Text("summary")).await;
    store.record_entry("u1", "note", Utc::now()).await.unwrap();

    let (_, first) =
      send(state.clone(), "POST", "/compile-weekly-log/", compile_body("u1")).await;
    let (_, second) =
      send(state, "POST", "/compile-weekly-log/", compile_body("u1")).await;
    assert_eq!(first["compiled_log_id"], second["compiled_log_id"]);
    assert_eq!(store.list_compiled_logs("u1").await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn compile_without_entries_returns_404() {
    let (state, store) = make_state(StubSummarizer::Text("unused")).await;
    let (status, body) =
      send(state, "POST", "/compile-weekly-log/", compile_body("u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("No entries found for user u1"), "{detail}");
    assert!(store.list_compiled_logs("u1").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn blocked_generation_returns_500_and_writes_nothing() {
    let (state, store) = make_state(StubSummarizer::Blocked).await;
    store.record_entry("u1", "note", Utc::now()).await.unwrap();

    let (status, body) =
      send(state, "POST", "/compile-weekly-log/", compile_body("u1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("SAFETY"));
    assert!(store.list_compiled_logs("u1").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn generation_failure_returns_500_with_message() {
    let (state, store) = make_state(StubSummarizer::Fail).await;
    store.record_entry("u1", "note", Utc::now()).await.unwrap();

    let (status, body) =
      send(state, "POST", "/compile-weekly-log/", compile_body("u1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
      body["detail"],
      "Failed to compile log with AI: upstream timed out"
    );
  }

  #[tokio::test]
  async fn fetch_failure_returns_500_with_message() {
    let (state, inner) = failing_state(true, false).await;
    let (status, body) =
      send(state, "POST", "/compile-weekly-log/", compile_body("u1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Failed to fetch raw entries: connection refused");
    assert!(inner.list_compiled_logs("u1").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn persist_failure_returns_500_with_message() {
    let (state, inner) = failing_state(false, true).await;
    let (status, body) =
      send(state, "POST", "/compile-weekly-log/", compile_body("u1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Failed to save compiled log: disk full");
    assert!(inner.list_compiled_logs("u1").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn blank_user_id_returns_400() {
    let (state, _) = make_state(StubSummarizer::Text("unused")).await;
    let (status, _) =
      send(state, "POST", "/compile-weekly-log/", compile_body("  ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn missing_user_id_is_rejected() {
    let (state, _) = make_state(StubSummarizer::Text("unused")).await;
    let (status, _) =
      send(state, "POST", "/compile-weekly-log/", Some(json!({}))).await;
    assert!(status.is_client_error(), "{status}");
  }

  // ── History ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn history_lists_compiled_logs() {
    let (state, store) = make_state(StubSummarizer::Text("summary")).await;
    store.record_entry("u1", "note", Utc::now()).await.unwrap();
    send(state.clone(), "POST", "/compile-weekly-log/", compile_body("u1")).await;

    let (status, body) = send(state, "GET", "/compiled-logs?user_id=u1", None).await;
    assert_eq!(status, StatusCode::OK);
    let logs = body.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["markdown_blob"], "summary");
  }

  #[tokio::test]
  async fn history_for_unknown_user_is_empty() {
    let (state, _) = make_state(StubSummarizer::Text("unused")).await;
    let (status, body) = send(state, "GET", "/compiled-logs?user_id=nobody", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn history_without_user_id_returns_400() {
    let (state, _) = make_state(StubSummarizer::Text("unused")).await;
    let (status, body) = send(state, "GET", "/compiled-logs", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().is_some());
  }
}
