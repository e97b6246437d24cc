#![forbid(unsafe_code)]

//! Core logic for correcting the exercise-catalog spreadsheet export.
//!
//! This crate provides:
//! - An `.xlsx` reader (shared strings + first worksheet)
//! - Column-shift correction and rule-based level inference
//! - CSV and SQL emitters with atomic writes
//! - Distribution statistics
//! - Configuration, errors and logging setup

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod xlsx;
pub mod remap;
pub mod rules;
pub mod pipeline;
pub mod output;
pub mod csv_export;
pub mod sql_export;
pub mod report;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use types::*;
pub use config::Config;
pub use rules::{infer_level, RuleTable, Vocabulary};
pub use pipeline::{load_records, run, RunSummary};
pub use report::Report;
