//! Aggregate read models derived from the current generation.
//!
//! None of these are stored; they are computed on every query.

use serde::{Deserialize, Serialize};

use crate::project::ProjectRecord;

/// Round to two decimal places, halves away from zero. Used for per-project
/// percentages.
pub fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

/// Round to two decimal places, halves to the even digit. Used for the
/// overall completion percentage.
pub fn round2_half_even(value: f64) -> f64 { (value * 100.0).round_ties_even() / 100.0 }

// ─── Totals ──────────────────────────────────────────────────────────────────

/// Raw sums over one generation, as returned by the store.
///
/// Sums are `None` when the generation has no records, matching SQL `SUM`
/// over an empty set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationTotals {
  pub total_footage:     Option<f64>,
  pub completed_footage: Option<f64>,
  pub material_cost:     Option<f64>,
  pub labor_cost:        Option<f64>,
  pub total_cost:        Option<f64>,
  /// Number of distinct project names.
  pub project_count:     u64,
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Body of `GET /api/stats`.
///
/// With no generation (or an empty one) every sum is `null`, `project_count`
/// is `0` and `completion_percentage` falls back to `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
  pub total_footage:         Option<f64>,
  pub completed_footage:     Option<f64>,
  pub material_cost:         Option<f64>,
  pub labor_cost:            Option<f64>,
  pub total_cost:            Option<f64>,
  pub project_count:         u64,
  pub completion_percentage: f64,
}

impl From<GenerationTotals> for Stats {
  fn from(t: GenerationTotals) -> Self {
    let completion_percentage = match (t.total_footage, t.completed_footage) {
      (Some(total), completed) if total > 0.0 => {
        round2_half_even(completed.unwrap_or(0.0) / total * 100.0)
      }
      _ => 0.0,
    };

    Self {
      total_footage: t.total_footage,
      completed_footage: t.completed_footage,
      material_cost: t.material_cost,
      labor_cost: t.labor_cost,
      total_cost: t.total_cost,
      project_count: t.project_count,
      completion_percentage,
    }
  }
}

// ─── Project rows ────────────────────────────────────────────────────────────

/// One element of `GET /api/projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
  pub project_name:      String,
  pub total_footage:     f64,
  pub completed_footage: f64,
  pub material_cost:     f64,
  pub labor_cost:        f64,
  pub total_cost:        f64,
  pub recorded_date:     String,
  /// `None` when `total_footage` is zero. Unlike [`Stats`], no fallback to 0.
  pub completion_pct:    Option<f64>,
}

impl From<ProjectRecord> for ProjectRow {
  fn from(r: ProjectRecord) -> Self {
    let completion_pct = (r.total_footage != 0.0)
      .then(|| round2(r.completed_footage * 100.0 / r.total_footage));

    Self {
      project_name: r.project_name,
      total_footage: r.total_footage,
      completed_footage: r.completed_footage,
      material_cost: r.material_cost,
      labor_cost: r.labor_cost,
      total_cost: r.total_cost,
      recorded_date: r.recorded_date,
      completion_pct,
    }
  }
}
