//! JSON REST API for fiberops.
//!
//! Exposes an axum [`Router`] over a [`SyncEngine`]. Transport concerns
//! (binding, TLS, request tracing) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", fiberops_api::api_router(engine.clone()))
//! ```

pub mod error;
pub mod health;
pub mod history;
pub mod reports;
pub mod sync;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use fiberops_core::{source::SheetReader, store::OpsStore};
use fiberops_sync::SyncEngine;

pub use error::ApiError;

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R, S>(engine: Arc<SyncEngine<R, S>>) -> Router<()>
where
  R: SheetReader + 'static,
  S: OpsStore + 'static,
{
  Router::new()
    .route("/health", get(health::handler))
    .route("/sync", post(sync::handler::<R, S>))
    .route("/stats", get(reports::stats::<R, S>))
    .route("/projects", get(reports::projects::<R, S>))
    .route("/history", get(history::handler::<R, S>))
    .with_state(engine)
}

// ─── Integration tests ────────────────────────────────────────────────────────
