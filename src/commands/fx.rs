// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{LedgerStore, filter_by_month};
use crate::utils::{maybe_print_json, parse_month, pretty_table};
use anyhow::Result;

/// Lists the FX table as loaded. Rates are informational; nothing converts
/// through them.
pub fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m.trim())?),
        None => None,
    };
    let tables = store.tables()?;
    let rows = filter_by_month(&tables.fx, month.as_deref());
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| vec![r.month.clone(), r.currency.clone(), r.rate_to_usd.to_string()])
            .collect();
        println!("{}", pretty_table(&["Month", "Currency", "Rate to USD"], data));
    }
    Ok(())
}
