// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{LedgerStore, LedgerTables};
use crate::models::{COGS, LedgerRecord, REVENUE};
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::BTreeSet;

fn months_of(rows: &[LedgerRecord]) -> BTreeSet<&str> {
    rows.iter().map(|r| r.month.as_str()).collect()
}

/// Issue/detail pairs describing gaps in the loaded data.
pub fn diagnose(t: &LedgerTables) -> Vec<(String, String)> {
    let mut issues = Vec::new();

    // 1) Datasets the source did not provide
    for d in &t.missing {
        issues.push(("missing_dataset".to_string(), d.to_string()));
    }

    // 2) Budget months without actuals
    let actual_months = months_of(&t.actuals);
    for m in months_of(&t.budget).difference(&actual_months) {
        issues.push(("budget_without_actuals".to_string(), m.to_string()));
    }

    // 3) Actual months without a cash balance
    let cash_months: BTreeSet<&str> = t.cash.iter().map(|c| c.month.as_str()).collect();
    for m in actual_months.difference(&cash_months) {
        issues.push(("missing_cash".to_string(), m.to_string()));
    }

    // 4) Categories outside Revenue / COGS / Opex:*
    let unknown: BTreeSet<&str> = t
        .actuals
        .iter()
        .chain(t.budget.iter())
        .filter(|r| r.account_category != REVENUE && r.account_category != COGS && !r.is_opex())
        .map(|r| r.account_category.as_str())
        .collect();
    for c in unknown {
        issues.push(("unknown_category".to_string(), c.to_string()));
    }

    issues
}

pub fn handle(store: &LedgerStore) -> Result<()> {
    let tables = store.tables()?;
    let issues = diagnose(&tables);
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(i, d)| vec![i, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
