// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Answer templates.
//!
//! Output is restricted to the markup the front ends understand: `**bold**`,
//! lines starting with `• `, and plain `$` amounts. Keep new templates inside
//! that subset.

use crate::metrics::{TrendWindow, pct_of};
use crate::models::{MarginPoint, MonthlySummary, OpexRow, RunwayEstimate};
use crate::utils::{
    fmt_1dp, fmt_pct, fmt_signed_1dp, fmt_signed_pct, fmt_signed_usd, fmt_usd, title_case_tag,
};
use rust_decimal::Decimal;
use std::fmt::Write;

const TREND_THRESHOLD: Decimal = Decimal::from_parts(5, 0, 0, false, 2); // 0.05

pub const BULLET: &str = "• ";

/// Which month an answer covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A month the user asked for.
    Month(String),
    /// No month asked for; the most recent month in the data.
    Latest(String),
    /// No month asked for and no actuals to pick one from.
    AllMonths,
}

impl Scope {
    pub fn month(&self) -> Option<&str> {
        match self {
            Scope::Month(m) | Scope::Latest(m) => Some(m.as_str()),
            Scope::AllMonths => None,
        }
    }

    /// Suffix used in headings, e.g. `for 2023-06` or `(Latest Month)`.
    pub fn label(&self) -> String {
        match self {
            Scope::Month(m) => format!("for {m}"),
            Scope::Latest(m) => format!("(Latest Month: {m})"),
            Scope::AllMonths => "(Latest Month)".to_string(),
        }
    }
}

pub fn direction_word(value: Decimal, up_word: &'static str, down_word: &'static str) -> &'static str {
    if value > Decimal::ZERO {
        up_word
    } else if value < Decimal::ZERO {
        down_word
    } else {
        "in line with"
    }
}

/// `delta` is a proportion: 0.05 means five points.
pub fn trend_word(delta: Decimal) -> &'static str {
    if delta > TREND_THRESHOLD {
        "improving"
    } else if delta < -TREND_THRESHOLD {
        "declining"
    } else {
        "flat"
    }
}

pub fn runway_status(runway_months: Decimal) -> &'static str {
    if runway_months > Decimal::from(12) {
        "Healthy"
    } else if runway_months > Decimal::from(6) {
        "Monitor"
    } else {
        "Critical"
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn bold(s: &str) -> String {
    format!("**{s}**")
}

fn bullet(label: &str, body: &str) -> String {
    format!("{BULLET}{} {body}", bold(&format!("{label}:")))
}

fn vs_line(actual: &str, budget: &str) -> String {
    format!("{actual} actual vs {budget} budget")
}

fn variance_line(variance: Decimal, base: Decimal) -> String {
    format!(
        "  Variance: {} ({})",
        fmt_signed_usd(variance),
        fmt_signed_pct(pct_of(variance, base))
    )
}

pub fn revenue_vs_budget(s: &MonthlySummary, scope: &Scope) -> String {
    let revenue_variance = s.revenue_actual - s.revenue_budget;
    let ebitda_variance = s.ebitda_actual - s.ebitda_budget;
    let gm_delta_pp = s.gross_margin_actual - s.gross_margin_budget;

    [
        bold(&format!("Revenue vs Budget Analysis {}", scope.label())),
        String::new(),
        bullet(
            "Revenue",
            &vs_line(&fmt_usd(s.revenue_actual), &fmt_usd(s.revenue_budget)),
        ),
        variance_line(revenue_variance, s.revenue_budget),
        String::new(),
        bullet(
            "Gross Margin",
            &vs_line(
                &fmt_pct(s.gross_margin_actual),
                &fmt_pct(s.gross_margin_budget),
            ),
        ),
        String::new(),
        bullet(
            "EBITDA",
            &vs_line(&fmt_usd(s.ebitda_actual), &fmt_usd(s.ebitda_budget)),
        ),
        variance_line(ebitda_variance, s.ebitda_budget),
        String::new(),
        format!(
            "Summary: Revenue was {} budget by {}; gross margin is {} vs plan ({} pp); EBITDA finished {} plan by {}.",
            direction_word(revenue_variance, "above", "below"),
            fmt_usd(revenue_variance.abs()),
            trend_word(gm_delta_pp / Decimal::ONE_HUNDRED),
            fmt_signed_1dp(gm_delta_pp),
            direction_word(ebitda_variance, "above", "below"),
            fmt_usd(ebitda_variance.abs()),
        ),
    ]
    .join("\n")
}

/// Falls back to the no-data message when `points` is empty.
pub fn margin_trend(points: &[MarginPoint], window: TrendWindow) -> String {
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return no_margin_data(),
    };
    let n = Decimal::from(points.len());
    let avg_actual = points.iter().map(|p| p.actual).sum::<Decimal>() / n;
    let avg_budget = points.iter().map(|p| p.budget).sum::<Decimal>() / n;
    let latest_variance = last.actual - last.budget;
    let avg_variance = avg_actual - avg_budget;
    let direction = trend_word((last.actual - first.actual) / Decimal::ONE_HUNDRED);

    [
        bold(&format!(
            "Gross Margin Trend Analysis - {}",
            title_case_tag(window.tag())
        )),
        String::new(),
        bullet(
            "Latest Month",
            &format!(
                "{} ({})",
                vs_line(&fmt_pct(last.actual), &fmt_pct(last.budget)),
                last.month
            ),
        ),
        format!("  Variance: {} percentage points", fmt_signed_1dp(latest_variance)),
        String::new(),
        bullet(
            "Average",
            &vs_line(&fmt_pct(avg_actual), &fmt_pct(avg_budget)),
        ),
        format!("  Variance: {} percentage points", fmt_signed_1dp(avg_variance)),
        String::new(),
        bullet(
            "Trend",
            &format!("{} over the period", capitalize(direction)),
        ),
        String::new(),
        format!(
            "Summary: Latest margin is {} budget by {} pp; the period average is {} budget by {} pp.",
            direction_word(latest_variance, "above", "below"),
            fmt_signed_1dp(latest_variance),
            direction_word(avg_variance, "above", "below"),
            fmt_signed_1dp(avg_variance),
        ),
    ]
    .join("\n")
}

pub fn no_margin_data() -> String {
    "No actuals data available to chart a gross margin trend.".to_string()
}

pub fn opex_breakdown(rows: &[OpexRow], scope: &Scope) -> String {
    let top = match rows.iter().max_by(|a, b| a.actual.cmp(&b.actual)) {
        Some(top) => top,
        None => return no_opex_data(),
    };
    let total_actual: Decimal = rows.iter().map(|r| r.actual).sum();
    let total_budget: Decimal = rows.iter().map(|r| r.budget).sum();
    let total_variance = total_actual - total_budget;

    let mut out = [
        bold(&format!("Opex Breakdown Analysis {}", scope.label())),
        String::new(),
        bullet(
            "Total Opex",
            &vs_line(&fmt_usd(total_actual), &fmt_usd(total_budget)),
        ),
        variance_line(total_variance, total_budget),
        String::new(),
        bold("By Category:"),
    ]
    .join("\n");

    for r in rows {
        let _ = write!(
            out,
            "\n\n{}",
            bullet(
                r.display_name(),
                &format!(
                    "{} ({})",
                    vs_line(&fmt_usd(r.actual), &fmt_usd(r.budget)),
                    fmt_signed_pct(r.variance_pct)
                ),
            )
        );
    }
    let _ = write!(
        out,
        "\n\nSummary: Total opex was {} budget by {}. Largest spend was {} at {}.",
        direction_word(total_variance, "over", "under"),
        fmt_usd(total_variance.abs()),
        top.display_name(),
        fmt_usd(top.actual),
    );
    out
}

pub fn no_opex_data() -> String {
    "No Opex data available for the specified period.".to_string()
}

pub fn cash_runway(r: &RunwayEstimate) -> String {
    [
        bold("Cash Runway Analysis"),
        String::new(),
        bullet("Current Cash", &fmt_usd(r.current_cash)),
        String::new(),
        bullet("Average Monthly Burn", &fmt_usd(r.avg_monthly_burn)),
        String::new(),
        bullet("Cash Runway", &format!("{} months", fmt_1dp(r.runway_months))),
        String::new(),
        format!("{} {}", bold("Status:"), runway_status(r.runway_months)),
        String::new(),
        format!(
            "Summary: With {} on hand and an average monthly burn of {}, runway is approximately {} months.",
            fmt_usd(r.current_cash),
            fmt_usd(r.avg_monthly_burn),
            fmt_1dp(r.runway_months),
        ),
    ]
    .join("\n")
}

pub fn no_cash_data() -> String {
    "No cash data available.".to_string()
}

pub fn ebitda(s: &MonthlySummary, scope: &Scope) -> String {
    let variance = s.ebitda_actual - s.ebitda_budget;
    [
        bold(&format!("EBITDA Analysis {}", scope.label())),
        String::new(),
        bullet("Revenue", &fmt_usd(s.revenue_actual)),
        String::new(),
        bullet("COGS", &fmt_usd(s.cogs_actual)),
        String::new(),
        bullet("Opex", &fmt_usd(s.opex_actual)),
        String::new(),
        bullet(
            "EBITDA",
            &vs_line(&fmt_usd(s.ebitda_actual), &fmt_usd(s.ebitda_budget)),
        ),
        variance_line(variance, s.ebitda_budget),
        String::new(),
        bullet("Gross Margin", &fmt_pct(s.gross_margin_actual)),
        String::new(),
        format!(
            "Summary: EBITDA was {} budget by {}.",
            direction_word(variance, "above", "below"),
            fmt_usd(variance.abs())
        ),
    ]
    .join("\n")
}

pub fn overview(s: &MonthlySummary, runway: &RunwayEstimate, scope: &Scope) -> String {
    [
        bold(&format!("Financial Overview {}", scope.label())),
        String::new(),
        bullet(
            "Revenue",
            &vs_line(&fmt_usd(s.revenue_actual), &fmt_usd(s.revenue_budget)),
        ),
        variance_line(s.revenue_actual - s.revenue_budget, s.revenue_budget),
        String::new(),
        bullet(
            "Gross Margin",
            &vs_line(
                &fmt_pct(s.gross_margin_actual),
                &fmt_pct(s.gross_margin_budget),
            ),
        ),
        String::new(),
        bullet(
            "EBITDA",
            &vs_line(&fmt_usd(s.ebitda_actual), &fmt_usd(s.ebitda_budget)),
        ),
        variance_line(s.ebitda_actual - s.ebitda_budget, s.ebitda_budget),
        String::new(),
        bullet(
            "Cash Runway",
            &format!("{} months", fmt_1dp(runway.runway_months)),
        ),
        String::new(),
        bold("Available Analyses:"),
        String::new(),
        format!("{BULLET}Revenue vs Budget comparisons"),
        format!("{BULLET}Gross Margin trends"),
        format!("{BULLET}Opex breakdown by category"),
        format!("{BULLET}Cash runway analysis"),
        format!("{BULLET}EBITDA performance"),
        String::new(),
        "Try asking: \"What was June 2025 revenue vs budget?\" or \"Show me gross margin trends\""
            .to_string(),
    ]
    .join("\n")
}

pub fn failure(reason: &str) -> String {
    format!("Sorry, I encountered an error processing your query: {reason}")
}
