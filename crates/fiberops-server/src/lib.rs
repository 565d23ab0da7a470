//! Process bootstrap for the fiberops server: configuration and the
//! top-level HTTP application.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context as _, bail};
use axum::Router;
use fiberops_core::{source::SheetReader, store::OpsStore};
use fiberops_sheets::{DEFAULT_API_BASE, SheetsConfig};
use fiberops_sync::{EngineConfig, SyncEngine};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Prefix for configuration taken from the environment, e.g.
/// `FIBEROPS_SHEET_ID`.
pub const ENV_PREFIX: &str = "FIBEROPS";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default)]
  pub sheet_id:           String,
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  #[serde(default = "default_credentials_path")]
  pub credentials_path:   PathBuf,
  #[serde(default = "default_sheets_api_base")]
  pub sheets_api_base:    String,
  #[serde(default)]
  pub audit_failed_syncs: bool,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 5000 }
fn default_store_path() -> PathBuf { PathBuf::from("data/fiber_ops.db") }
fn default_credentials_path() -> PathBuf { PathBuf::from("credentials/credentials.json") }
fn default_sheets_api_base() -> String { DEFAULT_API_BASE.to_owned() }

impl ServerConfig {
  /// Read `path` (if it exists), then overlay `FIBEROPS_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()
      .context("failed to read config file")?;
    Self::from_settings(settings)
  }

  /// Deserialise and validate already-layered settings.
  pub fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    if cfg.sheet_id.trim().is_empty() {
      bail!("sheet_id is required (set it in the config file or {ENV_PREFIX}_SHEET_ID)");
    }
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.credentials_path = expand_tilde(&cfg.credentials_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn engine_config(&self) -> EngineConfig {
    EngineConfig {
      spreadsheet_id:     self.sheet_id.clone(),
      audit_failed_syncs: self.audit_failed_syncs,
    }
  }

  pub fn sheets_config(&self) -> SheetsConfig {
    SheetsConfig::new(&self.credentials_path).with_api_base(&self.sheets_api_base)
  }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with per-request tracing.
pub fn app<R, S>(engine: Arc<SyncEngine<R, S>>) -> Router
where
  R: SheetReader + 'static,
  S: OpsStore + 'static,
{
  Router::new()
    .nest("/api", fiberops_api::api_router(engine))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
