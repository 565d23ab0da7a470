//! End-to-end reader tests against a local stand-in for the token endpoint
//! and the Sheets v4 API.

use std::{
  collections::HashMap,
  net::SocketAddr,
  path::PathBuf,
  sync::Arc,
};

use axum::{
  Form, Json, Router,
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
  routing::{get, post},
};
use fiberops_core::source::{SheetReader, SheetSession};
use fiberops_sheets::{Error, SheetsConfig, SheetsReader, SummaryTotals};
use serde_json::json;

const TEST_KEY: &str = include_str!("test_key.pem");
const TOKEN: &str = "test-access-token";

// ─── Fake Google ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Fake {
  reject_tokens: bool,
}

async fn token(
  State(fake): State<Arc<Fake>>,
  Form(form): Form<HashMap<String, String>>,
) -> Response {
  let grant_ok = form.get("grant_type").map(String::as_str)
    == Some("urn:ietf:params:oauth:grant-type:jwt-bearer");
  let has_assertion = form.get("assertion").is_some_and(|a| a.split('.').count() == 3);

  if fake.reject_tokens || !grant_ok || !has_assertion {
    return (StatusCode::UNAUTHORIZED, "invalid_grant").into_response();
  }
  Json(json!({ "access_token": TOKEN, "token_type": "Bearer", "expires_in": 3599 }))
    .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn spreadsheet(headers: HeaderMap, Path(id): Path<String>) -> Response {
  if !authorized(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  match id.as_str() {
    "missing" => (StatusCode::NOT_FOUND, "Requested entity was not found.").into_response(),
    "no-tabs" => Json(json!({})).into_response(),
    _ => Json(json!({
      "sheets": [
        { "properties": { "title": "Field Log" } },
        { "properties": { "title": "Labor" } },
      ]
    }))
    .into_response(),
  }
}

async fn values(headers: HeaderMap, Path((id, range)): Path<(String, String)>) -> Response {
  if !authorized(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  let body = match (id.as_str(), range.as_str()) {
    (_, "'Cover Page'!B11") => json!({ "values": [[12500.75]] }),
    (_, "'Labor'!F34") => json!({ "values": [["320"]] }),
    ("bad-total", "'Labor'!J43") => json!({ "values": [["n/a"]] }),
    (_, "'Labor'!J43") => json!({ "range": "'Labor'!J43" }),
    ("empty", "'Field Log'") => json!({ "range": "'Field Log'!A1:Z1000", "majorDimension": "ROWS" }),
    (_, "'Field Log'") => json!({
      "range": "'Field Log'!A1:G3",
      "majorDimension": "ROWS",
      "values": [
        ["Project Name", "Total Footage", "Completed Footage", "Date"],
        ["Elm St", 1200, 300.5, "2024-03-01"],
        ["Oak Ave", "n/a"],
      ]
    }),
    (_, "'Labor'") => json!({
      "values": [["Crew", "Hours"], ["North", 40]]
    }),
    _ => return StatusCode::BAD_REQUEST.into_response(),
  };
  Json(body).into_response()
}

async fn spawn(fake: Fake) -> SocketAddr {
  let app = Router::new()
    .route("/token", post(token))
    .route("/v4/spreadsheets/{id}", get(spreadsheet))
    .route("/v4/spreadsheets/{id}/values/{range}", get(values))
    .with_state(Arc::new(fake));

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  addr
}

/// Write a service-account key pointing at the fake token endpoint.
fn write_key(name: &str, addr: SocketAddr) -> PathBuf {
  let path = std::env::temp_dir()
    .join(format!("fiberops-{name}-{}.json", std::process::id()));
  let key = json!({
    "type": "service_account",
    "client_email": "sync-bot@example.iam.gserviceaccount.com",
    "private_key": TEST_KEY,
    "token_uri": format!("http://{addr}/token"),
  });
  std::fs::write(&path, key.to_string()).unwrap();
  path
}

async fn reader(name: &str, fake: Fake) -> SheetsReader {
  let addr = spawn(fake).await;
  let config = SheetsConfig::new(write_key(name, addr))
    .with_api_base(format!("http://{addr}"));
  SheetsReader::new(config).unwrap()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetches_first_worksheet_by_header() {
  let reader = reader("first", Fake { reject_tokens: false }).await;
  let session = reader.authenticate().await.unwrap();

  let rows = session.fetch_all_records("sheet-123").await.unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].get("Project Name"), Some("Elm St"));
  assert_eq!(rows[0].get("Total Footage"), Some("1200"));
  assert_eq!(rows[0].get("Completed Footage"), Some("300.5"));
  assert_eq!(rows[1].get("Total Footage"), Some("n/a"));
  assert_eq!(rows[1].get("Date"), Some(""));
}

#[tokio::test]
async fn empty_worksheet_yields_no_rows() {
  let reader = reader("empty", Fake { reject_tokens: false }).await;
  let session = reader.authenticate().await.unwrap();
  assert!(session.fetch_all_records("empty").await.unwrap().is_empty());
}

#[tokio::test]
async fn lists_and_reads_other_tabs() {
  let reader = reader("tabs", Fake { reject_tokens: false }).await;
  let session = reader.authenticate().await.unwrap();

  let titles = session.sheet_titles("sheet-123").await.unwrap();
  assert_eq!(titles, ["Field Log", "Labor"]);

  let labor = session.read_sheet("sheet-123", "Labor").await.unwrap();
  assert_eq!(labor.len(), 1);
  assert_eq!(labor[0].get("Hours"), Some("40"));
}

#[tokio::test]
async fn reads_summary_cells() {
  let reader = reader("summary", Fake { reject_tokens: false }).await;
  let session = reader.authenticate().await.unwrap();

  assert_eq!(session.read_number("sheet-123", "Labor", "F34").await.unwrap(), 320.0);

  let totals = session.summary_totals("sheet-123").await;
  assert_eq!(totals.materials_total, 12500.75);
  assert_eq!(totals.labor_hours_total, 320.0);
  assert_eq!(totals.labor_cost_total, 0.0);
}

#[tokio::test]
async fn unreadable_summary_cell_zeroes_all_totals() {
  let reader = reader("bad-total", Fake { reject_tokens: false }).await;
  let session = reader.authenticate().await.unwrap();

  let err = session.read_number("bad-total", "Labor", "J43").await.unwrap_err();
  assert!(matches!(err, Error::NotANumber(ref range) if range == "'Labor'!J43"), "{err}");

  assert_eq!(session.summary_totals("bad-total").await, SummaryTotals::default());
}

#[tokio::test]
async fn spreadsheet_without_tabs_errors() {
  let reader = reader("no-tabs", Fake { reject_tokens: false }).await;
  let session = reader.authenticate().await.unwrap();
  let err = session.fetch_all_records("no-tabs").await.unwrap_err();
  assert!(matches!(err, Error::NoWorksheets(_)));
}

#[tokio::test]
async fn api_failure_is_a_fetch_error() {
  let reader = reader("missing", Fake { reject_tokens: false }).await;
  let session = reader.authenticate().await.unwrap();

  let err = session.fetch_all_records("missing").await.unwrap_err();
  assert!(matches!(err, Error::Api { status: 404, .. }), "{err}");
  assert!(!err.is_auth());
}

#[tokio::test]
async fn rejected_assertion_is_an_auth_error() {
  let reader = reader("rejected", Fake { reject_tokens: true }).await;
  let err = reader.authenticate().await.err().unwrap();
  assert!(matches!(err, Error::TokenRejected { status: 401, .. }), "{err}");
  assert!(err.is_auth());
}

#[tokio::test]
async fn missing_key_file_is_an_auth_error() {
  let config = SheetsConfig::new("/nonexistent/fiberops/credentials.json");
  let err = SheetsReader::new(config)
    .unwrap()
    .authenticate()
    .await
    .err()
    .unwrap();
  assert!(matches!(err, Error::CredentialsMissing(_)));
  assert!(err.is_auth());
}

#[tokio::test]
async fn malformed_key_file_is_an_auth_error() {
  let path = std::env::temp_dir()
    .join(format!("fiberops-malformed-{}.json", std::process::id()));
  std::fs::write(&path, "{ this is not json").unwrap();

  let err = SheetsReader::new(SheetsConfig::new(&path))
    .unwrap()
    .authenticate()
    .await
    .err()
    .unwrap();
  assert!(matches!(err, Error::CredentialsMalformed(_)));
}

#[test]
fn rejects_unusable_api_base() {
  let config = SheetsConfig::new("creds.json").with_api_base("not a url");
  assert!(matches!(SheetsReader::new(config), Err(Error::InvalidUrl(_))));
}
