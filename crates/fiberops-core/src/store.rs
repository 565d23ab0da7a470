//! The `OpsStore` trait.
//!
//! Implemented by storage backends (e.g. `fiberops-store-sqlite`). The sync
//! engine depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  project::{GenerationId, NewProjectRecord, ProjectRecord, SyncGeneration},
  stats::GenerationTotals,
};

/// Abstraction over the generation/record store.
///
/// Writes are append-only: a generation and its records are created together
/// and never touched again. "Current state" is the latest successful
/// generation; failure rows are history only.
pub trait OpsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert a `success` generation stamped `synced_at` together with all of
  /// `records`, in one transaction. Either the generation and every record
  /// become visible, or nothing does.
  fn commit_generation(
    &self,
    synced_at: DateTime<Utc>,
    records: Vec<NewProjectRecord>,
  ) -> impl Future<Output = Result<SyncGeneration, Self::Error>> + Send + '_;

  /// Insert a `failure` generation with no records.
  fn record_failure(
    &self,
    attempted_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<SyncGeneration, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Id of the latest successful generation, or `None` if none exists.
  fn latest_generation_id(
    &self,
  ) -> impl Future<Output = Result<Option<GenerationId>, Self::Error>> + Send + '_;

  /// Sums and distinct project count over one generation.
  fn generation_totals(
    &self,
    id: GenerationId,
  ) -> impl Future<Output = Result<GenerationTotals, Self::Error>> + Send + '_;

  /// All records of one generation, ordered by project name ascending.
  fn generation_records(
    &self,
    id: GenerationId,
  ) -> impl Future<Output = Result<Vec<ProjectRecord>, Self::Error>> + Send + '_;

  /// Generations with `sync_time >= since`, newest first, at most `limit`.
  fn list_generations(
    &self,
    since: DateTime<Utc>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<SyncGeneration>, Self::Error>> + Send + '_;
}
