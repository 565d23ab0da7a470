//! Handler for `POST /sync`.
//!
//! Always answers `200 OK`. Whether the import worked is reported in the
//! body's `success` flag, never through the status code.

use std::sync::Arc;

use axum::{Json, extract::State};
use fiberops_core::{source::SheetReader, store::OpsStore};
use fiberops_sync::{SyncEngine, SyncOutcome};

/// `POST /sync`. Body: `{"success": bool, "message": "..."}`
pub async fn handler<R, S>(
  State(engine): State<Arc<SyncEngine<R, S>>>,
) -> Json<SyncOutcome>
where
  R: SheetReader,
  S: OpsStore,
{
  Json(engine.sync().await)
}
