//! Handlers for the current-generation reports.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stats` | Sums over the latest generation; `null` sums before the first sync |
//! | `GET`  | `/projects` | Latest generation, ordered by `project_name` |

use std::sync::Arc;

use axum::{Json, extract::State};
use fiberops_core::{
  source::SheetReader,
  stats::{ProjectRow, Stats},
  store::OpsStore,
};
use fiberops_sync::SyncEngine;

use crate::error::ApiError;

/// `GET /stats`
pub async fn stats<R, S>(
  State(engine): State<Arc<SyncEngine<R, S>>>,
) -> Result<Json<Stats>, ApiError>
where
  R: SheetReader,
  S: OpsStore,
{
  let stats = engine.get_stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}

/// `GET /projects`
pub async fn projects<R, S>(
  State(engine): State<Arc<SyncEngine<R, S>>>,
) -> Result<Json<Vec<ProjectRow>>, ApiError>
where
  R: SheetReader,
  S: OpsStore,
{
  let projects = engine.get_projects().await.map_err(ApiError::store)?;
  Ok(Json(projects))
}
