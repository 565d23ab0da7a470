//! SQL schema for the fiberops SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per sync attempt. AUTOINCREMENT keeps ids strictly increasing even
-- if rows were ever removed by hand.
CREATE TABLE IF NOT EXISTS sync_history (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    sync_time       TEXT    NOT NULL,   -- RFC 3339 UTC, fixed width
    records_synced  INTEGER NOT NULL,
    status          TEXT    NOT NULL CHECK (status IN ('success', 'failure'))
);

-- Append-only. Rows are written together with their sync_history row and
-- never updated or deleted.
CREATE TABLE IF NOT EXISTS project_data (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    sync_id           INTEGER NOT NULL REFERENCES sync_history(id),
    project_name      TEXT    NOT NULL,
    total_footage     REAL    NOT NULL,
    completed_footage REAL    NOT NULL,
    material_cost     REAL    NOT NULL,
    labor_cost        REAL    NOT NULL,
    total_cost        REAL    NOT NULL,
    recorded_date     TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS project_data_sync_idx ON project_data(sync_id);
CREATE INDEX IF NOT EXISTS sync_history_time_idx ON sync_history(sync_time);

PRAGMA user_version = 1;
";
