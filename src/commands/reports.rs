// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{LedgerStore, LedgerTables};
use crate::metrics::{self, TrendWindow, pct_of};
use crate::models::MonthlySummary;
use crate::narrative::runway_status;
use crate::utils::{fmt_1dp, fmt_pct, fmt_signed_pct, maybe_print_json, parse_month, pretty_table};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

/// `--month` if given, else the latest month in actuals.
fn month_or_latest(tables: &LedgerTables, sub: &clap::ArgMatches) -> Result<Option<String>> {
    match sub.get_one::<String>("month") {
        Some(m) => Ok(Some(parse_month(m.trim())?)),
        None => Ok(tables.latest_month().map(str::to_string)),
    }
}

fn money(d: Decimal) -> String {
    format!("{:.2}", d)
}

pub fn summary(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let tables = store.tables()?;
    let month = month_or_latest(&tables, sub)?;
    let s = metrics::monthly_summary(&tables, month.as_deref());
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        println!("Month: {}", month.as_deref().unwrap_or("(all)"));
        println!(
            "{}",
            pretty_table(&["Metric", "Actual", "Budget"], summary_rows(&s))
        );
        println!("Cash: {}", money(s.cash));
    }
    Ok(())
}

fn summary_rows(s: &MonthlySummary) -> Vec<Vec<String>> {
    vec![
        vec!["Revenue".into(), money(s.revenue_actual), money(s.revenue_budget)],
        vec!["COGS".into(), money(s.cogs_actual), money(s.cogs_budget)],
        vec!["Opex".into(), money(s.opex_actual), money(s.opex_budget)],
        vec![
            "Gross Margin".into(),
            fmt_pct(s.gross_margin_actual),
            fmt_pct(s.gross_margin_budget),
        ],
        vec!["EBITDA".into(), money(s.ebitda_actual), money(s.ebitda_budget)],
    ]
}

pub fn opex(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let tables = store.tables()?;
    let month = month_or_latest(&tables, sub)?;
    let rows = metrics::opex_breakdown(&tables, month.as_deref());
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.display_name().to_string(),
                    money(r.actual),
                    money(r.budget),
                    money(r.variance),
                    fmt_signed_pct(r.variance_pct),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Actual", "Budget", "Variance", "Variance %"], data)
        );
    }
    Ok(())
}

pub fn trend(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let window = TrendWindow::from_tag(sub.get_one::<String>("period").map(|s| s.as_str()));
    let tables = store.tables()?;
    let points = metrics::gross_margin_trend(&tables, window);
    if !maybe_print_json(json_flag, jsonl_flag, &points)? {
        let data = points
            .iter()
            .map(|p| vec![p.month.clone(), fmt_pct(p.actual), fmt_pct(p.budget)])
            .collect();
        println!("{}", pretty_table(&["Month", "Actual GM", "Budget GM"], data));
    }
    Ok(())
}

pub fn runway(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let tables = store.tables()?;
    let est = metrics::cash_runway(&tables);
    if !maybe_print_json(json_flag, jsonl_flag, &est)? {
        let data = vec![
            vec!["Current cash".into(), money(est.current_cash)],
            vec!["Avg monthly burn".into(), money(est.avg_monthly_burn)],
            vec!["Runway (months)".into(), fmt_1dp(est.runway_months)],
            vec!["Status".into(), runway_status(est.runway_months).into()],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], data));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveLine {
    pub metric: &'static str,
    pub actual: Decimal,
    pub budget: Decimal,
    pub variance: Decimal,
    pub variance_pct: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveSummary {
    pub month: Option<String>,
    pub lines: Vec<ExecutiveLine>,
    pub gross_margin_actual: Decimal,
    pub gross_margin_budget: Decimal,
    pub runway_months: Decimal,
    pub runway_status: &'static str,
    pub recommendations: Vec<&'static str>,
}

fn line(metric: &'static str, actual: Decimal, budget: Decimal) -> ExecutiveLine {
    let variance = actual - budget;
    ExecutiveLine {
        metric,
        actual,
        budget,
        variance,
        variance_pct: pct_of(variance, budget),
    }
}

/// Key metrics, runway and recommendations for one month.
pub fn executive_summary(tables: &LedgerTables, month: Option<&str>) -> ExecutiveSummary {
    let s = metrics::monthly_summary(tables, month);
    let runway = metrics::cash_runway(tables);
    let lines = vec![
        line("Revenue", s.revenue_actual, s.revenue_budget),
        line("COGS", s.cogs_actual, s.cogs_budget),
        line("Opex", s.opex_actual, s.opex_budget),
        line("EBITDA", s.ebitda_actual, s.ebitda_budget),
    ];
    let revenue_pct = lines[0].variance_pct;
    let ebitda_pct = lines[3].variance_pct;
    let five = Decimal::from(5);
    let recommendations = vec![
        if revenue_pct > five {
            "Continue current growth trajectory"
        } else if revenue_pct < -five {
            "Focus on revenue growth initiatives"
        } else {
            "Maintain current revenue levels"
        },
        if ebitda_pct < Decimal::from(-10) {
            "Optimize cost structure"
        } else {
            "Maintain current cost efficiency"
        },
        if runway.runway_months < Decimal::from(12) {
            "Monitor cash burn closely"
        } else {
            "Cash position is healthy"
        },
    ];
    ExecutiveSummary {
        month: month.map(str::to_string),
        lines,
        gross_margin_actual: s.gross_margin_actual,
        gross_margin_budget: s.gross_margin_budget,
        runway_months: runway.runway_months,
        runway_status: runway_status(runway.runway_months),
        recommendations,
    }
}

pub fn report(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let tables = store.tables().context("Load ledger for report")?;
    let month = month_or_latest(&tables, sub)?;
    let exec = executive_summary(&tables, month.as_deref());
    if maybe_print_json(json_flag, jsonl_flag, &exec)? {
        return Ok(());
    }
    println!("CFO Executive Summary ({})", month.as_deref().unwrap_or("all months"));
    let data = exec
        .lines
        .iter()
        .map(|l| {
            vec![
                l.metric.to_string(),
                money(l.actual),
                money(l.budget),
                money(l.variance),
                fmt_signed_pct(l.variance_pct),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Metric", "Actual", "Budget", "Variance", "Variance %"], data)
    );
    println!(
        "Gross margin: {} actual vs {} budget",
        fmt_pct(exec.gross_margin_actual),
        fmt_pct(exec.gross_margin_budget)
    );
    println!(
        "Cash runway: {} months ({})",
        fmt_1dp(exec.runway_months),
        exec.runway_status
    );
    println!("Recommendations:");
    for r in &exec.recommendations {
        println!("  • {}", r);
    }
    Ok(())
}
