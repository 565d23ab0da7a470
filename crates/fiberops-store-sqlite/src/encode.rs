//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! precision and a `Z` suffix, so that text comparison and `ORDER BY` agree
//! with chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use fiberops_core::project::{SyncGeneration, SyncStatus};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── SyncStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: SyncStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<SyncStatus> {
  match s {
    "success" => Ok(SyncStatus::Success),
    "failure" => Ok(SyncStatus::Failure),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `sync_history` row.
pub struct RawGeneration {
  pub id:             i64,
  pub sync_time:      String,
  pub records_synced: i64,
  pub status:         String,
}

impl RawGeneration {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      sync_time:      row.get(1)?,
      records_synced: row.get(2)?,
      status:         row.get(3)?,
    })
  }

  pub fn into_generation(self) -> Result<SyncGeneration> {
    Ok(SyncGeneration {
      id:             self.id,
      sync_time:      decode_dt(&self.sync_time)?,
      records_synced: u64::try_from(self.records_synced)
        .map_err(|_| Error::NegativeCount(self.records_synced))?,
      status:         decode_status(&self.status)?,
    })
  }
}
