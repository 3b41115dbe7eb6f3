// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cfo_copilot::ledger::{LedgerStore, LedgerTables};
use cfo_copilot::models::{CashRecord, LedgerRecord};
use cfo_copilot::{cli, commands::exporter};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::tempdir;

fn rec(month: &str, cat: &str, amount: i64) -> LedgerRecord {
    LedgerRecord::new(month, cat, Decimal::from(amount))
}

fn store() -> LedgerStore {
    LedgerStore::from_tables(LedgerTables {
        actuals: vec![
            rec("2023-05", "Revenue", 80_000),
            rec("2023-05", "COGS", 40_000),
            rec("2023-06", "Revenue", 100_000),
            rec("2023-06", "COGS", 40_000),
            rec("2023-06", "Opex:Marketing", 10_000),
            rec("2023-06", "Opex:Admin", 5_000),
        ],
        budget: vec![
            rec("2023-06", "Revenue", 90_000),
            rec("2023-06", "Opex:Marketing", 12_000),
        ],
        cash: vec![
            CashRecord::new("2023-06", Decimal::from(900)),
            CashRecord::new("2023-05", Decimal::from(1_000)),
        ],
        ..Default::default()
    })
}

fn run(args: &[&str]) {
    let mut argv = vec!["cfo", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, sub) = matches.subcommand().unwrap();
    exporter::handle(&store(), sub).unwrap();
}

#[test]
fn export_opex_writes_csv_with_header() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("opex.csv");
    run(&["opex", "--month", "2023-06", "--out", out.to_str().unwrap()]);

    let body = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "category,actual,budget,variance,variance_pct");
    assert_eq!(lines[1], "Opex:Admin,5000,0,5000,0");
    assert!(lines[2].starts_with("Opex:Marketing,10000,12000,-2000,"));
    assert_eq!(lines.len(), 3);
}

#[test]
fn export_opex_defaults_to_latest_month() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("opex.json");
    run(&["opex", "--format", "json", "--out", out.to_str().unwrap()]);

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v[1]["category"], "Opex:Marketing");
}

#[test]
fn export_trend_json() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("trend.json");
    run(&["trend", "--format", "json", "--out", out.to_str().unwrap()]);

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["month"], "2023-05");
    assert_eq!(arr[1]["month"], "2023-06");
}

#[test]
fn export_cash_is_chronological_with_change() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("cash.csv");
    run(&["cash", "--out", out.to_str().unwrap()]);

    let body = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines,
        vec!["month,cash_usd,change", "2023-05,1000,0", "2023-06,900,-100"]
    );
}
