//! [`SheetsReader`] and the authenticated [`SheetsSession`].

use std::{path::PathBuf, time::Duration};

use fiberops_core::source::{RawRow, SheetReader, SheetSession};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
  credentials::{ServiceAccountKey, TokenResponse, JWT_BEARER_GRANT},
  rows::{leading_number, quote_sheet_title, records_from_values},
  Error, Result,
};

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Where to find credentials and which API endpoint to talk to.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
  /// Path to the service-account JSON key.
  pub credentials_path: PathBuf,
  /// Base URL of the Sheets API, without the `/v4` suffix.
  pub api_base:         String,
  /// Per-request timeout, applied to token exchange and data reads alike.
  pub timeout:          Duration,
}

impl SheetsConfig {
  pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
    Self {
      credentials_path: credentials_path.into(),
      api_base:         DEFAULT_API_BASE.to_owned(),
      timeout:          Duration::from_secs(30),
    }
  }

  pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
    self.api_base = api_base.into();
    self
  }
}

// ─── Summary totals ──────────────────────────────────────────────────────────

/// Pre-computed totals kept in fixed cells of the workbook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
  /// `Cover Page!B11`
  pub materials_total:   f64,
  /// `Labor!F34`
  pub labor_hours_total: f64,
  /// `Labor!J43`
  pub labor_cost_total:  f64,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
  #[serde(default)]
  sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
  properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
  title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
  /// Absent when the requested range is empty.
  #[serde(default)]
  values: Vec<Vec<Value>>,
}

/// Turn a non-2xx response into [`Error::Api`].
async fn ensure_success(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Api { status: status.as_u16(), body })
}

// ─── Reader ──────────────────────────────────────────────────────────────────

/// Google Sheets reader. Holds no token; every [`SheetReader::authenticate`]
/// call performs a fresh exchange.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SheetsReader {
  client:           Client,
  api_base:         Url,
  credentials_path: PathBuf,
}

impl SheetsReader {
  pub fn new(config: SheetsConfig) -> Result<Self> {
    let api_base = Url::parse(&config.api_base)
      .map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.api_base)))?;
    if api_base.cannot_be_a_base() {
      return Err(Error::InvalidUrl(config.api_base));
    }
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, api_base, credentials_path: config.credentials_path })
  }
}

impl SheetReader for SheetsReader {
  type Error = Error;
  type Session = SheetsSession;

  async fn authenticate(&self) -> Result<SheetsSession> {
    let key = ServiceAccountKey::load(&self.credentials_path).await?;
    let assertion = key.assertion()?;

    let resp = self
      .client
      .post(&key.token_uri)
      .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::TokenRejected { status: status.as_u16(), body });
    }
    let token: TokenResponse = resp.json().await?;
    debug!(
      account = %key.client_email,
      expires_in = ?token.expires_in,
      "obtained sheets access token"
    );

    Ok(SheetsSession {
      client:       self.client.clone(),
      api_base:     self.api_base.clone(),
      access_token: token.access_token,
    })
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// An authenticated Sheets API handle.
#[derive(Clone)]
pub struct SheetsSession {
  client:       Client,
  api_base:     Url,
  access_token: String,
}

impl SheetsSession {
  /// Build `{api_base}/v4/spreadsheets/{segments...}` with each segment
  /// percent-encoded.
  fn url(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.api_base.clone();
    url
      .path_segments_mut()
      .map_err(|()| Error::InvalidUrl(self.api_base.to_string()))?
      .pop_if_empty()
      .extend(["v4", "spreadsheets"])
      .extend(segments);
    Ok(url)
  }

  /// Titles of every worksheet tab, in sheet order.
  pub async fn sheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
    let resp = self
      .client
      .get(self.url(&[spreadsheet_id])?)
      .bearer_auth(&self.access_token)
      .query(&[("fields", "sheets.properties.title")])
      .send()
      .await?;
    let meta: SpreadsheetMeta = ensure_success(resp).await?.json().await?;
    Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
  }

  /// Raw cell grid for an A1 `range`.
  pub async fn read_range(
    &self,
    spreadsheet_id: &str,
    range: &str,
  ) -> Result<Vec<Vec<Value>>> {
    let resp = self
      .client
      .get(self.url(&[spreadsheet_id, "values", range])?)
      .bearer_auth(&self.access_token)
      .query(&[
        ("majorDimension", "ROWS"),
        ("valueRenderOption", "UNFORMATTED_VALUE"),
        ("dateTimeRenderOption", "FORMATTED_STRING"),
      ])
      .send()
      .await?;
    let body: ValueRange = ensure_success(resp).await?.json().await?;
    Ok(body.values)
  }

  /// Header-keyed rows of the worksheet titled `title`.
  pub async fn read_sheet(&self, spreadsheet_id: &str, title: &str) -> Result<Vec<RawRow>> {
    let values = self
      .read_range(spreadsheet_id, &quote_sheet_title(title))
      .await?;
    let rows = records_from_values(&values);
    debug!(sheet = %title, rows = rows.len(), "read worksheet");
    Ok(rows)
  }

  /// Number in a single cell of the worksheet titled `sheet`.
  pub async fn read_number(&self, spreadsheet_id: &str, sheet: &str, cell: &str) -> Result<f64> {
    let range = format!("{}!{cell}", quote_sheet_title(sheet));
    let values = self.read_range(spreadsheet_id, &range).await?;
    leading_number(&values).ok_or(Error::NotANumber(range))
  }

  /// The workbook's summary cells. If any of them cannot be read, every
  /// total is reported as `0`.
  pub async fn summary_totals(&self, spreadsheet_id: &str) -> SummaryTotals {
    match self.try_summary_totals(spreadsheet_id).await {
      Ok(totals) => totals,
      Err(e) => {
        warn!(error = %e, spreadsheet_id, "could not read summary totals");
        SummaryTotals::default()
      }
    }
  }

  async fn try_summary_totals(&self, spreadsheet_id: &str) -> Result<SummaryTotals> {
    Ok(SummaryTotals {
      materials_total:   self.read_number(spreadsheet_id, "Cover Page", "B11").await?,
      labor_hours_total: self.read_number(spreadsheet_id, "Labor", "F34").await?,
      labor_cost_total:  self.read_number(spreadsheet_id, "Labor", "J43").await?,
    })
  }
}

impl SheetSession for SheetsSession {
  type Error = Error;

  async fn fetch_all_records(&self, spreadsheet_id: &str) -> Result<Vec<RawRow>> {
    let titles = self.sheet_titles(spreadsheet_id).await?;
    let first = titles
      .first()
      .ok_or_else(|| Error::NoWorksheets(spreadsheet_id.to_owned()))?;
    self.read_sheet(spreadsheet_id, first).await
  }
}
