//! [`SyncEngine`]: one sync operation and the read-side aggregates.

use chrono::{DateTime, Local, TimeDelta, Utc};
use fiberops_core::{
  coerce,
  project::{GenerationId, SyncGeneration},
  source::{SheetReader, SheetSession},
  stats::{ProjectRow, Stats},
  store::OpsStore,
  Error,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Most generations `get_history` will return.
pub const HISTORY_LIMIT: usize = 100;

/// Window used by `get_history` when the caller does not pick one.
pub const DEFAULT_HISTORY_DAYS: i64 = 30;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Inputs the engine needs at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
  /// Spreadsheet to import. Required and non-empty.
  pub spreadsheet_id:     String,
  /// Also write a `failure` generation when a sync fails. Failure rows show
  /// up in history but never become current state.
  pub audit_failed_syncs: bool,
}

impl EngineConfig {
  pub fn new(spreadsheet_id: impl Into<String>) -> Self {
    Self { spreadsheet_id: spreadsheet_id.into(), audit_failed_syncs: false }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of [`SyncEngine::sync`]. Also the body of `POST /api/sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
  pub success: bool,
  pub message: String,
}

impl SyncOutcome {
  fn succeeded(records: usize) -> Self {
    Self { success: true, message: format!("Successfully synced {records} records") }
  }

  fn failed(message: String) -> Self { Self { success: false, message } }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

pub struct SyncEngine<R, S> {
  config:    EngineConfig,
  reader:    R,
  store:     S,
  /// Held for the whole of `sync()`, so syncs of this spreadsheet never
  /// interleave.
  sync_lock: Mutex<()>,
}

impl<R, S> SyncEngine<R, S>
where
  R: SheetReader,
  S: OpsStore,
{
  /// Fails if `config.spreadsheet_id` is blank.
  pub fn new(config: EngineConfig, reader: R, store: S) -> Result<Self, Error> {
    if config.spreadsheet_id.trim().is_empty() {
      return Err(Error::Config("spreadsheet id must not be empty".into()));
    }
    Ok(Self { config, reader, store, sync_lock: Mutex::new(()) })
  }

  pub fn config(&self) -> &EngineConfig { &self.config }

  pub fn store(&self) -> &S { &self.store }

  // ── Sync ──────────────────────────────────────────────────────────────────

  /// Fetch every row, coerce it, and commit the batch as a new generation.
  ///
  /// Never returns an error: failures are reported in the outcome and leave
  /// the current generation unchanged.
  pub async fn sync(&self) -> SyncOutcome {
    let _guard = self.sync_lock.lock().await;

    let outcome = self.run_sync().await;
    if !outcome.success && self.config.audit_failed_syncs {
      if let Err(e) = self.store.record_failure(Utc::now()).await {
        warn!(error = %e, "could not record failed sync");
      }
    }
    outcome
  }

  async fn run_sync(&self) -> SyncOutcome {
    let spreadsheet_id = self.config.spreadsheet_id.as_str();

    let session = match self.reader.authenticate().await {
      Ok(session) => session,
      Err(e) => {
        warn!(error = %e, "spreadsheet authentication failed");
        return SyncOutcome::failed(format!(
          "Failed to connect to spreadsheet service: {e}"
        ));
      }
    };

    let rows = match session.fetch_all_records(spreadsheet_id).await {
      Ok(rows) => rows,
      Err(e) => {
        warn!(error = %e, spreadsheet_id, "spreadsheet fetch failed");
        return SyncOutcome::failed(format!("Sync error: {e}"));
      }
    };

    let today = Local::now().date_naive();
    let records: Vec<_> = rows
      .iter()
      .map(|row| coerce::project_record(row, today))
      .collect();
    let count = records.len();

    match self.store.commit_generation(Utc::now(), records).await {
      Ok(generation) => {
        info!(generation = generation.id, records = count, "sync complete");
        SyncOutcome::succeeded(count)
      }
      Err(e) => {
        warn!(error = %e, "sync commit failed");
        SyncOutcome::failed(format!("Sync error: {e}"))
      }
    }
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  /// The current generation, or `None` before the first successful sync.
  pub async fn latest_generation_id(&self) -> Result<Option<GenerationId>, S::Error> {
    self.store.latest_generation_id().await
  }

  /// Sums over the current generation. Before any sync, sums are `None`,
  /// the project count is `0` and the completion percentage is `0`.
  pub async fn get_stats(&self) -> Result<Stats, S::Error> {
    match self.store.latest_generation_id().await? {
      Some(id) => Ok(Stats::from(self.store.generation_totals(id).await?)),
      None => Ok(Stats::default()),
    }
  }

  /// Current-generation projects ordered by name.
  pub async fn get_projects(&self) -> Result<Vec<ProjectRow>, S::Error> {
    let Some(id) = self.store.latest_generation_id().await? else {
      return Ok(Vec::new());
    };
    let records = self.store.generation_records(id).await?;
    Ok(records.into_iter().map(ProjectRow::from).collect())
  }

  /// Generations from the last `window_days` days, newest first, capped at
  /// [`HISTORY_LIMIT`].
  pub async fn get_history(&self, window_days: i64) -> Result<Vec<SyncGeneration>, S::Error> {
    let since = window_start(Utc::now(), window_days);
    self.store.list_generations(since, HISTORY_LIMIT).await
  }
}

/// `now - days`, clamped: negative windows are empty and windows too large
/// for chrono cover all time.
fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
  TimeDelta::try_days(days.max(0))
    .and_then(|window| now.checked_sub_signed(window))
    .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
