// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived financial metrics. Every function here is pure over the loaded
//! tables: missing data produces zeros or empty rows, never an error. Ratios
//! too large for `Decimal` are reported as zero.

use crate::ledger::{Ledger, LedgerTables, aggregate_sum, filter_by_month, latest};
use crate::models::{
    COGS, CashTrendRow, LedgerRecord, MarginPoint, MonthlySummary, OpexRow, REVENUE, RunwayEstimate,
};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const RUNWAY_WINDOW: usize = 3;

/// Trailing windows understood by the margin trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendWindow {
    #[default]
    Last3Months,
    Last6Months,
    Last12Months,
}

impl TrendWindow {
    /// Anything other than the three known tags falls back to three months.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("last_6_months") => TrendWindow::Last6Months,
            Some("last_12_months") => TrendWindow::Last12Months,
            _ => TrendWindow::Last3Months,
        }
    }

    pub fn months(self) -> usize {
        match self {
            TrendWindow::Last3Months => 3,
            TrendWindow::Last6Months => 6,
            TrendWindow::Last12Months => 12,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            TrendWindow::Last3Months => "last_3_months",
            TrendWindow::Last6Months => "last_6_months",
            TrendWindow::Last12Months => "last_12_months",
        }
    }
}

/// `num / den * 100`, or zero unless `den` is positive.
pub fn pct_of(num: Decimal, den: Decimal) -> Decimal {
    if den <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    or_zero(
        num.checked_div(den).and_then(|q| q.checked_mul(HUNDRED)),
        "percentage",
    )
}

fn or_zero(value: Option<Decimal>, what: &str) -> Decimal {
    value.unwrap_or_else(|| {
        warn!("{what} out of range for Decimal; reported as 0");
        Decimal::ZERO
    })
}

pub fn gross_margin(revenue: Decimal, cogs: Decimal) -> Decimal {
    match revenue.checked_sub(cogs) {
        Some(gross_profit) => pct_of(gross_profit, revenue),
        None => or_zero(None, "gross margin"),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Families {
    revenue: Decimal,
    cogs: Decimal,
    opex: Decimal,
}

fn families(rows: &[&LedgerRecord]) -> Families {
    rows.iter().fold(Families::default(), |mut f, r| {
        if r.account_category == REVENUE {
            f.revenue += r.amount;
        } else if r.account_category == COGS {
            f.cogs += r.amount;
        } else if r.is_opex() {
            f.opex += r.amount;
        }
        f
    })
}

/// Sums of one month (or every month when `month` is `None`).
pub fn monthly_summary(t: &LedgerTables, month: Option<&str>) -> MonthlySummary {
    let act = families(&filter_by_month(t.ledger(Ledger::Actuals), month));
    let bud = families(&filter_by_month(t.ledger(Ledger::Budget), month));
    let cash = latest(filter_by_month(&t.cash, month))
        .map(|c| c.cash_usd)
        .unwrap_or(Decimal::ZERO);

    MonthlySummary {
        revenue_actual: act.revenue,
        revenue_budget: bud.revenue,
        cogs_actual: act.cogs,
        cogs_budget: bud.cogs,
        opex_actual: act.opex,
        opex_budget: bud.opex,
        gross_margin_actual: gross_margin(act.revenue, act.cogs),
        gross_margin_budget: gross_margin(bud.revenue, bud.cogs),
        ebitda_actual: act.revenue - act.cogs - act.opex,
        ebitda_budget: bud.revenue - bud.cogs - bud.opex,
        cash,
    }
}

fn opex_by_category(rows: &[LedgerRecord], month: Option<&str>) -> BTreeMap<String, Decimal> {
    let opex: Vec<&LedgerRecord> = filter_by_month(rows, month)
        .into_iter()
        .filter(|r| r.is_opex())
        .collect();
    aggregate_sum(&opex, |r| r.account_category.clone(), |r| r.amount)
}

/// One row per exact `Opex:` category found on either side, sorted by name.
pub fn opex_breakdown(t: &LedgerTables, month: Option<&str>) -> Vec<OpexRow> {
    let actual = opex_by_category(t.ledger(Ledger::Actuals), month);
    let budget = opex_by_category(t.ledger(Ledger::Budget), month);

    let categories: BTreeSet<&String> = actual.keys().chain(budget.keys()).collect();
    categories
        .into_iter()
        .map(|cat| {
            let a = actual.get(cat).copied().unwrap_or(Decimal::ZERO);
            let b = budget.get(cat).copied().unwrap_or(Decimal::ZERO);
            let variance = a - b;
            OpexRow {
                category: cat.clone(),
                actual: a,
                budget: b,
                variance,
                variance_pct: pct_of(variance, b),
            }
        })
        .collect()
}

/// Gross margin for the trailing months of actuals, in the order the months
/// first appear in the data.
pub fn gross_margin_trend(t: &LedgerTables, window: TrendWindow) -> Vec<MarginPoint> {
    let months = t.months();
    let start = months.len().saturating_sub(window.months());
    months[start..]
        .iter()
        .map(|m| {
            let act = families(&filter_by_month(t.ledger(Ledger::Actuals), Some(m.as_str())));
            let bud = families(&filter_by_month(t.ledger(Ledger::Budget), Some(m.as_str())));
            MarginPoint {
                month: m.clone(),
                actual: gross_margin(act.revenue, act.cogs),
                budget: gross_margin(bud.revenue, bud.cogs),
            }
        })
        .collect()
}

/// Months of cash left at the average burn of the trailing three months.
pub fn cash_runway(t: &LedgerTables) -> RunwayEstimate {
    if t.cash.len() < RUNWAY_WINDOW {
        return RunwayEstimate::default();
    }
    let sorted = t.cash_sorted();
    // burn is the negated month-over-month change; the first month has none
    let burns: Vec<Option<Decimal>> = sorted
        .windows(2)
        .map(|w| w[0].cash_usd.checked_sub(w[1].cash_usd))
        .collect();
    let recent = &burns[burns.len().saturating_sub(RUNWAY_WINDOW)..];
    let avg_monthly_burn = or_zero(
        recent
            .iter()
            .try_fold(Decimal::ZERO, |acc, b| acc.checked_add((*b)?))
            .and_then(|total| total.checked_div(Decimal::from(recent.len()))),
        "monthly burn",
    );
    let current_cash = sorted
        .last()
        .map(|c| c.cash_usd)
        .unwrap_or(Decimal::ZERO);
    let runway_months = if avg_monthly_burn > Decimal::ZERO {
        or_zero(current_cash.checked_div(avg_monthly_burn), "runway")
    } else {
        Decimal::ZERO
    };
    RunwayEstimate {
        current_cash,
        avg_monthly_burn,
        runway_months,
    }
}

/// The trailing `limit` cash balances in month order, each with its change
/// against the row before it.
pub fn cash_trend(t: &LedgerTables, limit: usize) -> Vec<CashTrendRow> {
    let sorted = t.cash_sorted();
    let start = sorted.len().saturating_sub(limit);
    let recent = &sorted[start..];
    recent
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let change = if i == 0 {
                Decimal::ZERO
            } else {
                c.cash_usd - recent[i - 1].cash_usd
            };
            CashTrendRow {
                month: c.month.clone(),
                cash_usd: c.cash_usd,
                change,
            }
        })
        .collect()
}
