//! The spreadsheet-reader contract.
//!
//! The sync engine only needs two capabilities from the outside world: get an
//! authenticated session, and read the rows of a spreadsheet through it.
//! `fiberops-sheets` implements these against Google Sheets; tests substitute
//! a stub.

use std::future::Future;

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One data row of a sheet, as `(column name, cell text)` pairs in column
/// order. Columns are addressed by header name, never by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
  cells: Vec<(String, String)>,
}

impl RawRow {
  pub fn new() -> Self { Self::default() }

  /// Append a cell. Later duplicates of a header name are kept but shadowed
  /// by the first occurrence in [`RawRow::get`].
  pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
    self.cells.push((column.into(), value.into()));
  }

  /// Builder-style [`RawRow::push`].
  pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
    self.push(column, value);
    self
  }

  /// The cell under `column`, or `None` if the sheet has no such header.
  pub fn get(&self, column: &str) -> Option<&str> {
    self
      .cells
      .iter()
      .find(|(name, _)| name == column)
      .map(|(_, value)| value.as_str())
  }

  pub fn len(&self) -> usize { self.cells.len() }

  pub fn is_empty(&self) -> bool { self.cells.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
    }
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Entry point to an external spreadsheet service.
pub trait SheetReader: Send + Sync {
  type Session: SheetSession;
  type Error: std::error::Error + Send + Sync + 'static;

  /// Establish an authenticated session. Fails if credentials are missing,
  /// malformed, or rejected.
  fn authenticate(
    &self,
  ) -> impl Future<Output = Result<Self::Session, Self::Error>> + Send + '_;
}

/// An authenticated handle obtained from [`SheetReader::authenticate`].
pub trait SheetSession: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the first worksheet of `spreadsheet_id`, using its first row as
  /// the header for every following row. An empty sheet yields `[]`.
  fn fetch_all_records<'a>(
    &'a self,
    spreadsheet_id: &'a str,
  ) -> impl Future<Output = Result<Vec<RawRow>, Self::Error>> + Send + 'a;
}
