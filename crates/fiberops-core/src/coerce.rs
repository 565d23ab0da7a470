//! Lenient conversion of raw sheet cells into typed project records.
//!
//! Ingestion never rejects a row. A numeric cell that is absent, blank or
//! unparsable becomes `0.0`; an absent or blank date becomes the sync day.

use chrono::NaiveDate;

use crate::{project::NewProjectRecord, source::RawRow};

// ─── Column names ────────────────────────────────────────────────────────────

pub const PROJECT_NAME: &str = "Project Name";
pub const TOTAL_FOOTAGE: &str = "Total Footage";
pub const COMPLETED_FOOTAGE: &str = "Completed Footage";
pub const MATERIAL_COST: &str = "Material Cost";
pub const LABOR_COST: &str = "Labor Cost";
pub const TOTAL_COST: &str = "Total Cost";
pub const DATE: &str = "Date";

/// Format of a defaulted `recorded_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Cells ───────────────────────────────────────────────────────────────────

/// Parse a numeric cell, defaulting to `0.0`. Non-finite values (`NaN`,
/// `inf`) count as unparsable.
pub fn number(cell: Option<&str>) -> f64 {
  cell
    .and_then(|s| s.trim().parse::<f64>().ok())
    .filter(|v| v.is_finite())
    .unwrap_or(0.0)
}

/// The date cell verbatim, or `today` when absent or blank.
pub fn date(cell: Option<&str>, today: NaiveDate) -> String {
  match cell {
    Some(s) if !s.trim().is_empty() => s.to_owned(),
    _ => today.format(DATE_FORMAT).to_string(),
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// Build a record from one sheet row.
pub fn project_record(row: &RawRow, today: NaiveDate) -> NewProjectRecord {
  NewProjectRecord {
    project_name:      row.get(PROJECT_NAME).unwrap_or_default().to_owned(),
    total_footage:     number(row.get(TOTAL_FOOTAGE)),
    completed_footage: number(row.get(COMPLETED_FOOTAGE)),
    material_cost:     number(row.get(MATERIAL_COST)),
    labor_cost:        number(row.get(LABOR_COST)),
    total_cost:        number(row.get(TOTAL_COST)),
    recorded_date:     date(row.get(DATE), today),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 17).unwrap() }

  #[test]
  fn numbers_parse() {
    assert_eq!(number(Some("1200")), 1200.0);
    assert_eq!(number(Some(" 87.5 ")), 87.5);
    assert_eq!(number(Some("-3")), -3.0);
  }

  #[test]
  fn bad_numbers_become_zero() {
    assert_eq!(number(None), 0.0);
    assert_eq!(number(Some("")), 0.0);
    assert_eq!(number(Some("n/a")), 0.0);
    assert_eq!(number(Some("1,200")), 0.0);
    assert_eq!(number(Some("NaN")), 0.0);
    assert_eq!(number(Some("inf")), 0.0);
  }

  #[test]
  fn missing_date_is_today() {
    assert_eq!(date(None, today()), "2024-05-17");
    assert_eq!(date(Some("  "), today()), "2024-05-17");
    assert_eq!(date(Some("3/14/2024"), today()), "3/14/2024");
  }

  #[test]
  fn full_row() {
    let row = RawRow::new()
      .with(PROJECT_NAME, "Oak Ave")
      .with(TOTAL_FOOTAGE, "1000")
      .with(COMPLETED_FOOTAGE, "250")
      .with(MATERIAL_COST, "4000.25")
      .with(LABOR_COST, "1000")
      .with(TOTAL_COST, "5000.25")
      .with(DATE, "2024-05-01");

    let record = project_record(&row, today());
    assert_eq!(record, NewProjectRecord {
      project_name:      "Oak Ave".into(),
      total_footage:     1000.0,
      completed_footage: 250.0,
      material_cost:     4000.25,
      labor_cost:        1000.0,
      total_cost:        5000.25,
      recorded_date:     "2024-05-01".into(),
    });
  }

  #[test]
  fn sparse_row_uses_defaults() {
    let row = RawRow::new()
      .with(PROJECT_NAME, "Pine Rd")
      .with(TOTAL_FOOTAGE, "pending");

    let record = project_record(&row, today());
    assert_eq!(record.project_name, "Pine Rd");
    assert_eq!(record.total_footage, 0.0);
    assert_eq!(record.completed_footage, 0.0);
    assert_eq!(record.total_cost, 0.0);
    assert_eq!(record.recorded_date, "2024-05-17");
  }

  #[test]
  fn unnamed_row_keeps_empty_name() {
    let record = project_record(&RawRow::new(), today());
    assert_eq!(record.project_name, "");
  }
}
