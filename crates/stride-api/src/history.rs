//! Handler for `GET /compiled-logs`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use stride_core::{log::CompiledLog, store::EntryStore, summarize::Summarizer};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id: Option<String>,
}

/// `GET /compiled-logs?user_id=<id>` — newest week first; empty if none.
pub async fn list<S, G>(
  State(state): State<ApiState<S, G>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CompiledLog>>, ApiError>
where
  S: EntryStore,
  G: Summarizer,
{
  let user_id = params
    .user_id
    .filter(|u| !u.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("user_id query parameter is required".into()))?;

  let logs = state
    .store
    .list_compiled_logs(&user_id)
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "failed to list compiled logs");
      ApiError::Store(Box::new(e))
    })?;
  Ok(Json(logs))
}
