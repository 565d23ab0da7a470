//! Sync and aggregation engine for fiberops.
//!
//! [`SyncEngine`] moves rows from a [`SheetReader`] into an [`OpsStore`] as a
//! new generation, and answers the aggregate queries behind the dashboard.
//! Every query is scoped to the latest successful generation.
//!
//! [`SheetReader`]: fiberops_core::source::SheetReader
//! [`OpsStore`]: fiberops_core::store::OpsStore

mod engine;

pub use engine::{
  DEFAULT_HISTORY_DAYS, EngineConfig, HISTORY_LIMIT, SyncEngine, SyncOutcome,
};
