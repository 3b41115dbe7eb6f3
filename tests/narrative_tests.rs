// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cfo_copilot::metrics::TrendWindow;
use cfo_copilot::models::{MarginPoint, MonthlySummary, OpexRow, RunwayEstimate};
use cfo_copilot::narrative::{
    self, Scope, direction_word, runway_status, trend_word,
};
use cfo_copilot::utils::{fmt_pct, fmt_signed_pct, fmt_signed_usd, fmt_usd, title_case_tag};
use rust_decimal::Decimal;

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

#[test]
fn currency_formatting() {
    assert_eq!(fmt_usd(d(12_345)), "$12,345");
    assert_eq!(fmt_usd(Decimal::new(12_345_675, 1)), "$1,234,568");
    assert_eq!(fmt_usd(d(-2_500)), "-$2,500");
    assert_eq!(fmt_usd(Decimal::ZERO), "$0");
    assert_eq!(fmt_signed_usd(d(10_000)), "+$10,000");
    assert_eq!(fmt_signed_usd(d(-10_000)), "-$10,000");
    assert_eq!(fmt_signed_usd(Decimal::new(-4, 1)), "$0");
}

#[test]
fn percent_formatting_rounds_half_away_from_zero() {
    assert_eq!(fmt_pct(d(60)), "60.0%");
    assert_eq!(fmt_pct(Decimal::new(1_225, 2)), "12.3%");
    assert_eq!(fmt_signed_pct(Decimal::new(-1_225, 2)), "-12.3%");
    assert_eq!(fmt_signed_pct(Decimal::new(111_111, 4)), "+11.1%");
}

#[test]
fn tag_titles() {
    assert_eq!(title_case_tag("last_3_months"), "Last 3 Months");
    assert_eq!(title_case_tag("ytd"), "Ytd");
}

#[test]
fn direction_words() {
    assert_eq!(direction_word(d(1), "above", "below"), "above");
    assert_eq!(direction_word(d(-1), "above", "below"), "below");
    assert_eq!(direction_word(Decimal::ZERO, "over", "under"), "in line with");
}

#[test]
fn trend_words_use_five_point_threshold() {
    assert_eq!(trend_word(Decimal::new(5, 2)), "flat");
    assert_eq!(trend_word(Decimal::new(-5, 2)), "flat");
    assert_eq!(trend_word(Decimal::new(51, 3)), "improving");
    assert_eq!(trend_word(Decimal::new(-51, 3)), "declining");
}

#[test]
fn runway_status_bands() {
    assert_eq!(runway_status(d(13)), "Healthy");
    assert_eq!(runway_status(d(12)), "Monitor");
    assert_eq!(runway_status(d(7)), "Monitor");
    assert_eq!(runway_status(d(6)), "Critical");
    assert_eq!(runway_status(Decimal::ZERO), "Critical");
}

#[test]
fn scope_labels() {
    assert_eq!(Scope::Month("2023-06".into()).label(), "for 2023-06");
    assert_eq!(
        Scope::Latest("2023-06".into()).label(),
        "(Latest Month: 2023-06)"
    );
    assert_eq!(Scope::AllMonths.label(), "(Latest Month)");
    assert_eq!(Scope::AllMonths.month(), None);
}

#[test]
fn revenue_narrative_reports_variances() {
    let s = MonthlySummary {
        revenue_actual: d(100_000),
        revenue_budget: d(90_000),
        cogs_actual: d(40_000),
        cogs_budget: d(36_000),
        gross_margin_actual: d(60),
        gross_margin_budget: d(60),
        ebitda_actual: d(45_000),
        ebitda_budget: d(50_000),
        ..Default::default()
    };
    let text = narrative::revenue_vs_budget(&s, &Scope::Month("2023-06".into()));
    assert!(text.starts_with("**Revenue vs Budget Analysis for 2023-06**"));
    assert!(text.contains("$100,000 actual vs $90,000 budget"));
    assert!(text.contains("+$10,000 (+11.1%)"));
    assert!(text.contains("60.0% actual vs 60.0% budget"));
    assert!(text.contains("-$5,000 (-10.0%)"));
    assert!(text.contains("Revenue was above budget by $10,000"));
    assert!(text.contains("EBITDA finished below plan by $5,000"));
}

#[test]
fn margin_trend_narrative() {
    let points = vec![
        MarginPoint {
            month: "2023-01".into(),
            actual: d(50),
            budget: d(55),
        },
        MarginPoint {
            month: "2023-02".into(),
            actual: d(60),
            budget: d(55),
        },
    ];
    let text = narrative::margin_trend(&points, TrendWindow::Last3Months);
    assert!(text.starts_with("**Gross Margin Trend Analysis - Last 3 Months**"));
    assert!(text.contains("60.0% actual vs 55.0% budget (2023-02)"));
    assert!(text.contains("Variance: +5.0 percentage points"));
    assert!(text.contains("Improving over the period"));
    assert_eq!(
        narrative::margin_trend(&[], TrendWindow::Last6Months),
        narrative::no_margin_data()
    );
}

#[test]
fn opex_narrative_strips_prefix_and_names_largest() {
    let rows = vec![
        OpexRow {
            category: "Opex:Admin".into(),
            actual: d(5_000),
            budget: d(4_000),
            variance: d(1_000),
            variance_pct: d(25),
        },
        OpexRow {
            category: "Opex:Marketing".into(),
            actual: d(12_000),
            budget: d(15_000),
            variance: d(-3_000),
            variance_pct: d(-20),
        },
    ];
    let text = narrative::opex_breakdown(&rows, &Scope::Latest("2023-03".into()));
    assert!(text.contains("(Latest Month: 2023-03)"));
    assert!(text.contains("**Marketing:** $12,000 actual vs $15,000 budget (-20.0%)"));
    assert!(!text.contains("Opex:Marketing"));
    assert!(text.contains("Total opex was under budget by $2,000"));
    assert!(text.contains("Largest spend was Marketing at $12,000"));
    assert_eq!(
        narrative::opex_breakdown(&[], &Scope::AllMonths),
        "No Opex data available for the specified period."
    );
}

#[test]
fn runway_narrative() {
    let r = RunwayEstimate {
        current_cash: d(1_200_000),
        avg_monthly_burn: d(100_000),
        runway_months: d(12),
    };
    let text = narrative::cash_runway(&r);
    assert!(text.starts_with("**Cash Runway Analysis**"));
    assert!(text.contains("**Current Cash:** $1,200,000"));
    assert!(text.contains("12.0 months"));
    assert!(text.contains("**Status:** Monitor"));
}

#[test]
fn failure_is_an_apology() {
    assert_eq!(
        narrative::failure("boom"),
        "Sorry, I encountered an error processing your query: boom"
    );
}
