//! Core types and trait definitions for fiberops.
//!
//! This crate has no HTTP or database dependencies. The
//! spreadsheet reader, the SQLite store, the sync engine and the JSON API all
//! depend on it and meet each other only through the traits defined here.

// Trait futures declare their `Send` bounds explicitly.
#![allow(async_fn_in_trait)]

pub mod coerce;
pub mod error;
pub mod project;
pub mod source;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
