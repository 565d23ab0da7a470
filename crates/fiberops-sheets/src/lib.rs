//! Google Sheets reader for fiberops.
//!
//! Implements [`fiberops_core::source::SheetReader`] against the Sheets v4
//! REST API, authenticating with a service-account key file.
//!
//! ```rust,ignore
//! let reader  = SheetsReader::new(SheetsConfig::new("credentials/credentials.json"))?;
//! let session = reader.authenticate().await?;
//! let rows    = session.fetch_all_records(&sheet_id).await?;
//! ```

mod client;
mod credentials;
mod rows;

pub mod error;

pub use client::{SheetsConfig, SheetsReader, SheetsSession, SummaryTotals, DEFAULT_API_BASE};
pub use error::{Error, Result};
pub use rows::{cell_text, leading_number, quote_sheet_title, records_from_values};
