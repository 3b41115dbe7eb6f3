// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::ledger::{CsvDirSource, LedgerSource};
use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Replaces the database contents with the CSV files found in `--dir`.
pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let dir = sub.get_one::<String>("dir").unwrap().trim();
    let source = CsvDirSource::new(dir);
    let tables = source
        .load()
        .with_context(|| format!("Read ledger CSV files from {}", dir))?;
    db::replace_all(conn, &tables)?;
    info!(
        actuals = tables.actuals.len(),
        budget = tables.budget.len(),
        cash = tables.cash.len(),
        fx = tables.fx.len(),
        "import complete"
    );
    for missing in &tables.missing {
        println!("Note: {}.csv not found in {}; table left empty", missing, dir);
    }
    println!(
        "Imported {} actuals, {} budget, {} cash and {} fx rows from {}",
        tables.actuals.len(),
        tables.budget.len(),
        tables.cash.len(),
        tables.fx.len(),
        dir
    );
    Ok(())
}
