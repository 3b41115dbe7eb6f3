// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring the ledger tables into memory.
///
/// This is the only error allowed to stop the program: once the tables are
/// loaded every query either succeeds or is downgraded to a narrative.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger source {} is not readable", path.display())]
    SourceUnavailable { path: PathBuf },

    #[error("Ledger source {source_name} has none of the actuals, budget, cash or fx datasets")]
    NoDatasets { source_name: String },

    #[error("Failed to read {dataset} data: {source}")]
    Csv {
        dataset: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid month '{value}' in {dataset} data, expected YYYY-MM")]
    InvalidMonth { dataset: &'static str, value: String },

    #[error("Invalid amount '{value}' in {dataset} data")]
    InvalidAmount { dataset: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A query that could not be answered. Never escapes the router.
#[derive(Debug, Error)]
pub enum ComputationFailure {
    #[error("ledger data unavailable: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    Invalid(String),
}
