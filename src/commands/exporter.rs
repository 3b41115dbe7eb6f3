// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::LedgerStore;
use crate::metrics::{self, TrendWindow};
use anyhow::{Result, anyhow};
use serde::Serialize;

const CASH_TREND_ROWS: usize = 12;

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("opex", sub)) => export_opex(store, sub),
        Some(("trend", sub)) => export_trend(store, sub),
        Some(("cash", sub)) => export_cash(store, sub),
        _ => Ok(()),
    }
}

fn write_rows<T: Serialize>(sub: &clap::ArgMatches, headers: &[&str], rows: &[T]) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(out)?;
            wtr.write_record(headers)?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(rows)?)?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    println!("Exported {} rows to {}", rows.len(), out);
    Ok(())
}

fn export_opex(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let tables = store.tables()?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(crate::utils::parse_month(m.trim())?),
        None => tables.latest_month().map(str::to_string),
    };
    let rows = metrics::opex_breakdown(&tables, month.as_deref());
    write_rows(
        sub,
        &["category", "actual", "budget", "variance", "variance_pct"],
        &rows,
    )
}

fn export_trend(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let window = TrendWindow::from_tag(sub.get_one::<String>("period").map(|s| s.as_str()));
    let tables = store.tables()?;
    let points = metrics::gross_margin_trend(&tables, window);
    write_rows(sub, &["month", "actual", "budget"], &points)
}

fn export_cash(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let tables = store.tables()?;
    let rows = metrics::cash_trend(&tables, CASH_TREND_ROWS);
    write_rows(sub, &["month", "cash_usd", "change"], &rows)
}
