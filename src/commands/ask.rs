// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::intent::IntentClassifier;
use crate::models::ChartSpec;
use crate::router::Copilot;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use comfy_table::Table;

fn query_text(sub: &clap::ArgMatches) -> String {
    sub.get_many::<String>("query")
        .map(|words| words.map(|w| w.trim()).collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

pub fn handle(copilot: &Copilot, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let response = copilot.answer(&query_text(sub));
    if maybe_print_json(json_flag, jsonl_flag, &response)? {
        return Ok(());
    }
    println!("{}", response.narrative);
    if let Some(chart) = &response.chart {
        println!();
        println!("{}", chart_table(chart));
    }
    Ok(())
}

/// Needs no ledger data.
pub fn classify(sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let c = IntentClassifier::new().classify(&query_text(sub));
    if !maybe_print_json(json_flag, jsonl_flag, &c)? {
        let rows = vec![
            vec!["operation".to_string(), c.operation.to_string()],
            vec![
                "month".to_string(),
                c.params.month.clone().unwrap_or_default(),
            ],
            vec![
                "time_period".to_string(),
                c.params
                    .time_period
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
            ],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

/// Terminal rendering of chart data: one row per category or x value.
pub fn chart_table(chart: &ChartSpec) -> Table {
    match chart {
        ChartSpec::GroupedBar { categories, series } => {
            let mut headers = vec!["Category"];
            headers.extend(series.iter().map(|s| s.name.as_str()));
            let rows = categories
                .iter()
                .enumerate()
                .map(|(i, cat)| {
                    let mut row = vec![cat.clone()];
                    row.extend(series.iter().map(|s| cell(s.values.get(i))));
                    row
                })
                .collect();
            pretty_table(&headers, rows)
        }
        ChartSpec::Line { x, series } => {
            let mut headers = vec!["Month"];
            headers.extend(series.iter().map(|s| s.name.as_str()));
            let rows = x
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let mut row = vec![label.clone()];
                    row.extend(series.iter().map(|s| cell(s.values.get(i))));
                    row
                })
                .collect();
            pretty_table(&headers, rows)
        }
        ChartSpec::Waterfall { categories, values } => {
            let rows = categories
                .iter()
                .zip(values)
                .map(|(cat, v)| vec![cat.clone(), format!("{:.2}", v)])
                .collect();
            pretty_table(&["Step", "Amount"], rows)
        }
    }
}

fn cell(v: Option<&f64>) -> String {
    v.map(|v| format!("{:.2}", v)).unwrap_or_default()
}
