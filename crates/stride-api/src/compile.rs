//! Handlers for `/` and `/compile-weekly-log/`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/` | Liveness message |
//! | `POST` | `/compile-weekly-log/` | Body: `{"user_id":"..."}`; returns [`CompileReport`] |

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use stride_core::{CompileReport, store::EntryStore, summarize::Summarizer};

use crate::{ApiState, error::ApiError};

pub const LIVENESS_MESSAGE: &str = "Hello, Stride Backend! Ready for action with Gemini.";

/// `GET /`
pub async fn root() -> Json<Value> { Json(json!({ "message": LIVENESS_MESSAGE })) }

#[derive(Debug, Deserialize)]
pub struct CompileLogRequest {
  pub user_id: String,
}

/// `POST /compile-weekly-log/` — compiles the current week for `user_id`.
pub async fn compile_weekly_log<S, G>(
  State(state): State<ApiState<S, G>>,
  Json(body): Json<CompileLogRequest>,
) -> Result<Json<CompileReport>, ApiError>
where
  S: EntryStore,
  G: Summarizer,
{
  if body.user_id.trim().is_empty() {
    return Err(ApiError::BadRequest("user_id must not be empty".into()));
  }

  let report = state.compiler.compile(&body.user_id, Utc::now()).await?;
  Ok(Json(report))
}
