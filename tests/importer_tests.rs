// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cfo_copilot::ledger::{LedgerSource, SqliteSource};
use cfo_copilot::{cli, commands::importer, db};
use rusqlite::Connection;
use std::fs;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn import_loads_csv_directory_into_tables() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("actuals.csv"),
        "month,entity,account_category,amount,currency\n\
         2023-01-01,ParentCo,Revenue,\"1,000\",USD\n\
         2023-01-01,ParentCo,Opex:Rent,250,USD\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("cash.csv"),
        "month,entity,cash_usd\n2023-01,ParentCo,5000\n",
    )
    .unwrap();

    let mut conn = base_conn();
    let matches = cli::build_cli().get_matches_from([
        "cfo",
        "import",
        "--dir",
        dir.path().to_str().unwrap(),
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    importer::handle(&mut conn, sub).unwrap();

    assert_eq!(count(&conn, "actuals"), 2);
    assert_eq!(count(&conn, "budget"), 0);
    assert_eq!(count(&conn, "cash"), 1);

    let (month, amount): (String, String) = conn
        .query_row(
            "SELECT month, amount FROM actuals WHERE account_category = 'Revenue'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(month, "2023-01");
    assert_eq!(amount, "1000");
}

#[test]
fn import_replaces_previous_contents() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("actuals.csv");
    let db_path = dir.path().join("ledger.sqlite");

    fs::write(&csv, "month,account_category,amount\n2023-01,Revenue,1\n2023-02,Revenue,2\n").unwrap();
    let mut conn = db::open_or_init(&db_path).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "cfo",
        "import",
        "--dir",
        dir.path().to_str().unwrap(),
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    importer::handle(&mut conn, sub).unwrap();

    fs::write(&csv, "month,account_category,amount\n2023-03,Revenue,3\n").unwrap();
    importer::handle(&mut conn, sub).unwrap();
    drop(conn);

    let tables = SqliteSource::new(&db_path).load().unwrap();
    assert_eq!(tables.actuals.len(), 1);
    assert_eq!(tables.actuals[0].month, "2023-03");
}

#[test]
fn import_rejects_bad_rows_and_keeps_old_data() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("actuals.csv");
    let mut conn = base_conn();

    fs::write(&csv, "month,account_category,amount\n2023-01,Revenue,1\n").unwrap();
    let matches = cli::build_cli().get_matches_from([
        "cfo",
        "import",
        "--dir",
        dir.path().to_str().unwrap(),
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    importer::handle(&mut conn, sub).unwrap();

    fs::write(&csv, "month,account_category,amount\nJanuary,Revenue,1\n").unwrap();
    assert!(importer::handle(&mut conn, sub).is_err());
    assert_eq!(count(&conn, "actuals"), 1);
}
