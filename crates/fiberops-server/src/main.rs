//! fiberops server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid with
//! `FIBEROPS_*` environment variables, opens the SQLite store, and serves
//! the JSON API under `/api`.
//!
//! ```text
//! FIBEROPS_SHEET_ID=1AbC... cargo run -p fiberops-server --bin fiberops
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use fiberops_core::source::SheetReader as _;
use fiberops_server::ServerConfig;
use fiberops_sheets::SheetsReader;
use fiberops_store_sqlite::SqliteStore;
use fiberops_sync::SyncEngine;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Fiber operations sync server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Run one sync, print its outcome, and exit.
  #[arg(long)]
  sync_once: bool,

  /// Print the workbook's summary totals and exit.
  #[arg(long)]
  summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let reader = SheetsReader::new(cfg.sheets_config())
    .context("failed to configure sheets reader")?;

  if cli.summary {
    let session = reader
      .authenticate()
      .await
      .context("failed to connect to spreadsheet service")?;
    let totals = session.summary_totals(&cfg.sheet_id).await;
    println!("materials total:   {}", totals.materials_total);
    println!("labor hours total: {}", totals.labor_hours_total);
    println!("labor cost total:  {}", totals.labor_cost_total);
    return Ok(());
  }

  let engine = Arc::new(
    SyncEngine::new(cfg.engine_config(), reader, store).context("invalid engine config")?,
  );

  if cli.sync_once {
    let outcome = engine.sync().await;
    println!("{}", outcome.message);
    if !outcome.success {
      anyhow::bail!("sync failed");
    }
    return Ok(());
  }

  let app = fiberops_server::app(engine);
  let address = cfg.address();

  tracing::info!(sheet_id = %cfg.sheet_id, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
