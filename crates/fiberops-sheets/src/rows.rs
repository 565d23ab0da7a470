//! Turning a Sheets `values` grid into header-keyed rows.

use fiberops_core::source::RawRow;
use serde_json::Value;

/// Render one cell as text. Numbers keep their unformatted JSON form so the
/// coercion layer can parse them back.
pub fn cell_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Null => String::new(),
    Value::Bool(true) => "TRUE".to_owned(),
    Value::Bool(false) => "FALSE".to_owned(),
    Value::Number(n) => n.to_string(),
    other => other.to_string(),
  }
}

/// Map a grid to rows using its first row as the header.
///
/// Short rows are padded with empty cells; cells past the last header column
/// are dropped. A grid with only a header (or nothing) yields no rows.
pub fn records_from_values(values: &[Vec<Value>]) -> Vec<RawRow> {
  let Some((header, data)) = values.split_first() else {
    return Vec::new();
  };
  let header: Vec<String> = header.iter().map(cell_text).collect();

  data
    .iter()
    .map(|row| {
      header
        .iter()
        .enumerate()
        .map(|(i, name)| {
          (name.clone(), row.get(i).map(cell_text).unwrap_or_default())
        })
        .collect()
    })
    .collect()
}

/// Numeric value of the top-left cell of a grid. An absent or empty cell
/// reads as `0`; text that does not parse as a number is `None`.
pub fn leading_number(values: &[Vec<Value>]) -> Option<f64> {
  match values.first().and_then(|row| row.first()) {
    None | Some(Value::Null) => Some(0.0),
    Some(Value::Number(n)) => n.as_f64(),
    Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
    Some(Value::String(s)) if s.trim().is_empty() => Some(0.0),
    Some(Value::String(s)) => s.trim().parse().ok(),
    Some(_) => None,
  }
}

/// A1-notation range covering a whole sheet. Titles are always quoted, with
/// embedded quotes doubled.
pub fn quote_sheet_title(title: &str) -> String {
  format!("'{}'", title.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn grid(v: Value) -> Vec<Vec<Value>> { serde_json::from_value(v).unwrap() }

  #[test]
  fn header_drives_keys() {
    let rows = records_from_values(&grid(json!([
      ["Project Name", "Total Footage", "Date"],
      ["Elm St", 1200, "2024-03-01"],
      ["Oak Ave", 87.5, ""],
    ])));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("Project Name"), Some("Elm St"));
    assert_eq!(rows[0].get("Total Footage"), Some("1200"));
    assert_eq!(rows[1].get("Total Footage"), Some("87.5"));
    assert_eq!(rows[1].get("Date"), Some(""));
  }

  #[test]
  fn columns_keep_header_order() {
    let rows = records_from_values(&grid(json!([
      ["Date", "Project Name", "Total Footage"],
      ["2024-03-01", "Elm St", 10],
    ])));

    let columns: Vec<_> = rows[0].iter().map(|(name, _)| name).collect();
    assert_eq!(columns, ["Date", "Project Name", "Total Footage"]);
    let cells: Vec<_> = rows[0].iter().map(|(_, value)| value).collect();
    assert_eq!(cells, ["2024-03-01", "Elm St", "10"]);
  }

  #[test]
  fn ragged_rows() {
    let rows = records_from_values(&grid(json!([
      ["A", "B"],
      ["1"],
      ["1", "2", "3"],
    ])));

    assert_eq!(rows[0].get("B"), Some(""));
    assert_eq!(rows[1].len(), 2);
    assert_eq!(rows[1].get("B"), Some("2"));
  }

  #[test]
  fn header_only_or_empty() {
    assert!(records_from_values(&grid(json!([["A", "B"]]))).is_empty());
    assert!(records_from_values(&[]).is_empty());
  }

  #[test]
  fn cell_rendering() {
    assert_eq!(cell_text(&json!(true)), "TRUE");
    assert_eq!(cell_text(&json!(null)), "");
    assert_eq!(cell_text(&json!(-4)), "-4");
  }

  #[test]
  fn leading_number_of_a_grid() {
    assert_eq!(leading_number(&grid(json!([[12500.75]]))), Some(12500.75));
    assert_eq!(leading_number(&grid(json!([[" 320 "]]))), Some(320.0));
    assert_eq!(leading_number(&grid(json!([[""]]))), Some(0.0));
    assert_eq!(leading_number(&[]), Some(0.0));
    assert_eq!(leading_number(&grid(json!([["n/a"]]))), None);
  }

  #[test]
  fn quoting() {
    assert_eq!(quote_sheet_title("Sheet1"), "'Sheet1'");
    assert_eq!(quote_sheet_title("Bob's Crew"), "'Bob''s Crew'");
  }
}
