//! [`SqliteStore`], the SQLite implementation of [`OpsStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use fiberops_core::{
  project::{GenerationId, NewProjectRecord, ProjectRecord, SyncGeneration, SyncStatus},
  stats::GenerationTotals,
  store::OpsStore,
};
use tracing::debug;

use crate::{
  encode::{encode_dt, encode_status, RawGeneration},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fiberops store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a generation row with no records.
  async fn insert_bare_generation(
    &self,
    at: DateTime<Utc>,
    status: SyncStatus,
  ) -> Result<SyncGeneration> {
    let at_str     = encode_dt(at);
    let status_str = encode_status(status);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sync_history (sync_time, records_synced, status)
           VALUES (?1, 0, ?2)",
          rusqlite::params![at_str, status_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(SyncGeneration { id, sync_time: at, records_synced: 0, status })
  }
}

// ─── OpsStore impl ───────────────────────────────────────────────────────────

impl OpsStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn commit_generation(
    &self,
    synced_at: DateTime<Utc>,
    records:   Vec<NewProjectRecord>,
  ) -> Result<SyncGeneration> {
    let at_str     = encode_dt(synced_at);
    let count      = records.len();
    let status_str = encode_status(SyncStatus::Success);

    let id = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls everything back, including the
        // sync_history row.
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO sync_history (sync_time, records_synced, status)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![at_str, count as i64, status_str],
        )?;
        let id = tx.last_insert_rowid();

        {
          let mut stmt = tx.prepare(
            "INSERT INTO project_data (
               sync_id, project_name, total_footage, completed_footage,
               material_cost, labor_cost, total_cost, recorded_date
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for r in &records {
            stmt.execute(rusqlite::params![
              id,
              r.project_name,
              r.total_footage,
              r.completed_footage,
              r.material_cost,
              r.labor_cost,
              r.total_cost,
              r.recorded_date,
            ])?;
          }
        }

        tx.commit()?;
        Ok(id)
      })
      .await?;

    debug!(generation = id, records = count, "committed generation");

    Ok(SyncGeneration {
      id,
      sync_time: synced_at,
      records_synced: count as u64,
      status: SyncStatus::Success,
    })
  }

  async fn record_failure(&self, attempted_at: DateTime<Utc>) -> Result<SyncGeneration> {
    self.insert_bare_generation(attempted_at, SyncStatus::Failure).await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn latest_generation_id(&self) -> Result<Option<GenerationId>> {
    let id = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT MAX(id) FROM sync_history WHERE status = 'success'",
          [],
          |row| row.get::<_, Option<i64>>(0),
        )?)
      })
      .await?;
    Ok(id)
  }

  async fn generation_totals(&self, id: GenerationId) -> Result<GenerationTotals> {
    let totals = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT
             SUM(total_footage),
             SUM(completed_footage),
             SUM(material_cost),
             SUM(labor_cost),
             SUM(total_cost),
             COUNT(DISTINCT project_name)
           FROM project_data
           WHERE sync_id = ?1",
          rusqlite::params![id],
          |row| {
            Ok(GenerationTotals {
              total_footage:     row.get(0)?,
              completed_footage: row.get(1)?,
              material_cost:     row.get(2)?,
              labor_cost:        row.get(3)?,
              total_cost:        row.get(4)?,
              project_count:     row.get::<_, i64>(5)? as u64,
            })
          },
        )?)
      })
      .await?;
    Ok(totals)
  }

  async fn generation_records(&self, id: GenerationId) -> Result<Vec<ProjectRecord>> {
    let records = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             sync_id, project_name, total_footage, completed_footage,
             material_cost, labor_cost, total_cost, recorded_date
           FROM project_data
           WHERE sync_id = ?1
           ORDER BY project_name ASC, id ASC",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![id], |row| {
            Ok(ProjectRecord {
              generation_id:     row.get(0)?,
              project_name:      row.get(1)?,
              total_footage:     row.get(2)?,
              completed_footage: row.get(3)?,
              material_cost:     row.get(4)?,
              labor_cost:        row.get(5)?,
              total_cost:        row.get(6)?,
              recorded_date:     row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;
    Ok(records)
  }

  async fn list_generations(
    &self,
    since: DateTime<Utc>,
    limit: usize,
  ) -> Result<Vec<SyncGeneration>> {
    let since_str = encode_dt(since);
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawGeneration> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, sync_time, records_synced, status
           FROM sync_history
           WHERE sync_time >= ?1
           ORDER BY sync_time DESC, id DESC
           LIMIT ?2",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![since_str, limit_val], RawGeneration::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGeneration::into_generation).collect()
  }
}
