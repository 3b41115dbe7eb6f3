// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::LedgerTables;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "CfoCopilot", "cfo-copilot"));

pub const SELECT_ACTUALS: &str =
    "SELECT month, account_category, CAST(amount AS TEXT) FROM actuals ORDER BY rowid";
pub const SELECT_BUDGET: &str =
    "SELECT month, account_category, CAST(amount AS TEXT) FROM budget ORDER BY rowid";
pub const SELECT_CASH: &str = "SELECT month, CAST(cash_usd AS TEXT) FROM cash ORDER BY rowid";
pub const SELECT_FX: &str =
    "SELECT month, currency, CAST(rate_to_usd AS TEXT) FROM fx ORDER BY rowid";

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cfo-copilot.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS actuals(
        month TEXT NOT NULL,            -- YYYY-MM
        account_category TEXT NOT NULL, -- Revenue, COGS, Opex:<name>, ...
        amount TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_actuals_month ON actuals(month);

    CREATE TABLE IF NOT EXISTS budget(
        month TEXT NOT NULL,
        account_category TEXT NOT NULL,
        amount TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_budget_month ON budget(month);

    CREATE TABLE IF NOT EXISTS cash(
        month TEXT NOT NULL,
        cash_usd TEXT NOT NULL
    );

    -- FX: 1 unit of currency = rate_to_usd USD
    CREATE TABLE IF NOT EXISTS fx(
        month TEXT NOT NULL,
        currency TEXT NOT NULL,
        rate_to_usd TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

/// Replaces every dataset in the database with `tables`, atomically.
pub fn replace_all(conn: &mut Connection, tables: &LedgerTables) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch("DELETE FROM actuals; DELETE FROM budget; DELETE FROM cash; DELETE FROM fx;")?;
    {
        let mut ins = tx.prepare(
            "INSERT INTO actuals(month, account_category, amount) VALUES (?1,?2,?3)",
        )?;
        for r in &tables.actuals {
            ins.execute(params![r.month, r.account_category, r.amount.to_string()])?;
        }
        let mut ins =
            tx.prepare("INSERT INTO budget(month, account_category, amount) VALUES (?1,?2,?3)")?;
        for r in &tables.budget {
            ins.execute(params![r.month, r.account_category, r.amount.to_string()])?;
        }
        let mut ins = tx.prepare("INSERT INTO cash(month, cash_usd) VALUES (?1,?2)")?;
        for r in &tables.cash {
            ins.execute(params![r.month, r.cash_usd.to_string()])?;
        }
        let mut ins =
            tx.prepare("INSERT INTO fx(month, currency, rate_to_usd) VALUES (?1,?2,?3)")?;
        for r in &tables.fx {
            ins.execute(params![r.month, r.currency, r.rate_to_usd.to_string()])?;
        }
    }
    tx.commit()?;
    Ok(())
}
