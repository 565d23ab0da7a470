//! Handler for `GET /history`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use fiberops_core::{project::SyncGeneration, source::SheetReader, store::OpsStore};
use fiberops_sync::{DEFAULT_HISTORY_DAYS, SyncEngine};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct HistoryParams {
  /// Window size in days. Kept as text so that a malformed value falls back
  /// to the default instead of rejecting the request.
  pub days: Option<String>,
}

impl HistoryParams {
  pub fn window_days(&self) -> i64 {
    self
      .days
      .as_deref()
      .and_then(|d| d.trim().parse().ok())
      .unwrap_or(DEFAULT_HISTORY_DAYS)
  }
}

/// `GET /history[?days=N]`
pub async fn handler<R, S>(
  State(engine): State<Arc<SyncEngine<R, S>>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<SyncGeneration>>, ApiError>
where
  R: SheetReader,
  S: OpsStore,
{
  let history = engine
    .get_history(params.window_days())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(history))
}
