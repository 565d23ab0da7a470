//! Generations and project records: the two persisted entities.
//!
//! A generation is an immutable batch produced by one sync. Records belong to
//! exactly one generation and are never updated; a correction is a new full
//! sync, which produces a new generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned generation identifier. Strictly increasing, never reused.
pub type GenerationId = i64;

// ─── Generation ──────────────────────────────────────────────────────────────

/// Outcome recorded on a generation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
  Success,
  Failure,
}

impl SyncStatus {
  /// The text stored in the `status` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Success => "success",
      Self::Failure => "failure",
    }
  }
}

/// One completed sync attempt. Serialises to the `/api/history` row shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncGeneration {
  pub id:             GenerationId,
  pub sync_time:      DateTime<Utc>,
  pub records_synced: u64,
  pub status:         SyncStatus,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A project's metrics as captured by one generation.
///
/// `completed_footage <= total_footage` is not enforced; the source sheet is
/// allowed to disagree with itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
  pub generation_id:     GenerationId,
  pub project_name:      String,
  pub total_footage:     f64,
  pub completed_footage: f64,
  pub material_cost:     f64,
  pub labor_cost:        f64,
  pub total_cost:        f64,
  pub recorded_date:     String,
}

/// Input to [`crate::store::OpsStore::commit_generation`]. The generation id
/// is assigned by the store when the batch is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProjectRecord {
  pub project_name:      String,
  pub total_footage:     f64,
  pub completed_footage: f64,
  pub material_cost:     f64,
  pub labor_cost:        f64,
  pub total_cost:        f64,
  pub recorded_date:     String,
}

impl NewProjectRecord {
  /// Attach the generation id assigned at commit time.
  pub fn into_record(self, generation_id: GenerationId) -> ProjectRecord {
    ProjectRecord {
      generation_id,
      project_name: self.project_name,
      total_footage: self.total_footage,
      completed_footage: self.completed_footage,
      material_cost: self.material_cost,
      labor_cost: self.labor_cost,
      total_cost: self.total_cost,
      recorded_date: self.recorded_date,
    }
  }
}
