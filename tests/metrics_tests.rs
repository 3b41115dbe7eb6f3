// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cfo_copilot::ledger::LedgerTables;
use cfo_copilot::metrics::{
    TrendWindow, cash_runway, cash_trend, gross_margin, gross_margin_trend, monthly_summary,
    opex_breakdown, pct_of,
};
use cfo_copilot::models::{CashRecord, LedgerRecord};
use rust_decimal::Decimal;

fn d(n: i64) -> Decimal {
    Decimal::from(n)
}

fn rec(month: &str, cat: &str, amount: i64) -> LedgerRecord {
    LedgerRecord::new(month, cat, d(amount))
}

fn cash(month: &str, amount: i64) -> CashRecord {
    CashRecord::new(month, d(amount))
}

fn setup() -> LedgerTables {
    LedgerTables {
        // insertion order is deliberately not chronological
        actuals: vec![
            rec("2023-04", "Revenue", 120_000),
            rec("2023-04", "COGS", 48_000),
            rec("2023-04", "Opex:Marketing", 15_000),
            rec("2023-01", "Revenue", 80_000),
            rec("2023-01", "COGS", 40_000),
            rec("2023-02", "Revenue", 90_000),
            rec("2023-02", "COGS", 36_000),
            rec("2023-03", "Revenue", 100_000),
            rec("2023-03", "COGS", 40_000),
            rec("2023-03", "Opex:Marketing", 10_000),
            rec("2023-03", "Opex:Admin", 5_000),
            rec("2023-03", "Opex:Admin", 2_000),
            rec("2023-03", "Opex:Travel", 1_000),
            rec("2023-03", "Other Income", 9_999),
        ],
        budget: vec![
            rec("2023-03", "Revenue", 90_000),
            rec("2023-03", "COGS", 36_000),
            rec("2023-03", "Opex:Marketing", 12_000),
            rec("2023-03", "Opex:Admin", 7_000),
            rec("2023-03", "Opex:Rent", 3_000),
        ],
        cash: vec![],
        fx: vec![],
        missing: vec![],
    }
}

#[test]
fn monthly_summary_matches_hand_computed_figures() {
    let t = setup();
    let s = monthly_summary(&t, Some("2023-03"));
    assert_eq!(s.revenue_actual, d(100_000));
    assert_eq!(s.revenue_budget, d(90_000));
    assert_eq!(s.cogs_actual, d(40_000));
    assert_eq!(s.opex_actual, d(18_000));
    assert_eq!(s.opex_budget, d(22_000));
    assert_eq!(s.gross_margin_actual, d(60));
    assert_eq!(s.gross_margin_budget, d(60));
    assert_eq!(s.ebitda_actual, d(100_000 - 40_000 - 18_000));
    assert_eq!(s.ebitda_budget, d(90_000 - 36_000 - 22_000));
    assert_eq!(s.cash, Decimal::ZERO);
}

#[test]
fn monthly_summary_for_absent_month_is_all_zero() {
    let t = setup();
    let s = monthly_summary(&t, Some("2030-01"));
    assert_eq!(s, Default::default());
}

#[test]
fn monthly_summary_without_month_spans_everything() {
    let t = setup();
    let s = monthly_summary(&t, None);
    assert_eq!(s.revenue_actual, d(390_000));
    assert_eq!(s.opex_actual, d(33_000));
}

#[test]
fn monthly_summary_cash_is_latest_record_in_month() {
    let mut t = setup();
    t.cash = vec![cash("2023-03", 500), cash("2023-04", 400), cash("2023-03", 450)];
    assert_eq!(monthly_summary(&t, Some("2023-03")).cash, d(450));
    assert_eq!(monthly_summary(&t, None).cash, d(400));
}

#[test]
fn margin_guards_against_zero_revenue() {
    assert_eq!(gross_margin(Decimal::ZERO, d(10)), Decimal::ZERO);
    assert_eq!(gross_margin(d(-5), d(10)), Decimal::ZERO);
    assert_eq!(pct_of(d(1), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(pct_of(d(1), d(4)), d(25));
}

#[test]
fn ratios_out_of_decimal_range_are_zero() {
    let tiny = Decimal::new(1, 21);
    assert_eq!(pct_of(d(1_000_000), tiny), Decimal::ZERO);
    assert_eq!(gross_margin(Decimal::MAX, Decimal::MIN), Decimal::ZERO);

    let t = LedgerTables {
        actuals: vec![rec("2023-06", "Opex:Tools", 1_000_000)],
        budget: vec![LedgerRecord::new("2023-06", "Opex:Tools", tiny)],
        ..Default::default()
    };
    let rows = opex_breakdown(&t, Some("2023-06"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].variance, d(1_000_000) - tiny);
    assert_eq!(rows[0].variance_pct, Decimal::ZERO);
}

#[test]
fn opex_breakdown_is_an_outer_join_sorted_by_category() {
    let t = setup();
    let rows = opex_breakdown(&t, Some("2023-03"));
    let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(
        names,
        vec!["Opex:Admin", "Opex:Marketing", "Opex:Rent", "Opex:Travel"]
    );

    let admin = &rows[0];
    assert_eq!(admin.actual, d(7_000));
    assert_eq!(admin.budget, d(7_000));
    assert_eq!(admin.variance, Decimal::ZERO);

    let rent = &rows[2];
    assert_eq!(rent.actual, Decimal::ZERO);
    assert_eq!(rent.variance, d(-3_000));
    assert_eq!(rent.variance_pct, d(-100));

    let travel = &rows[3];
    assert_eq!(travel.budget, Decimal::ZERO);
    assert_eq!(travel.variance_pct, Decimal::ZERO);
    assert_eq!(travel.display_name(), "Travel");
}

#[test]
fn opex_breakdown_totals_match_summary() {
    let t = setup();
    for month in [Some("2023-03"), Some("2023-04"), None] {
        let rows = opex_breakdown(&t, month);
        let total: Decimal = rows.iter().map(|r| r.actual).sum();
        assert_eq!(total, monthly_summary(&t, month).opex_actual);
    }
}

#[test]
fn opex_breakdown_empty_for_month_without_opex() {
    let t = setup();
    assert!(opex_breakdown(&t, Some("2023-01")).is_empty());
}

#[test]
fn trend_takes_trailing_months_in_first_seen_order() {
    let t = setup();
    let points = gross_margin_trend(&t, TrendWindow::Last3Months);
    let months: Vec<&str> = points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["2023-01", "2023-02", "2023-03"]);
    assert_eq!(points[0].actual, d(50));
    assert_eq!(points[1].actual, d(60));
    assert_eq!(points[2].budget, d(60));
    assert_eq!(points[0].budget, Decimal::ZERO);
}

#[test]
fn trend_length_is_bounded_by_available_months() {
    let t = setup();
    assert_eq!(gross_margin_trend(&t, TrendWindow::Last6Months).len(), 4);
    assert_eq!(gross_margin_trend(&t, TrendWindow::Last12Months).len(), 4);
    assert!(gross_margin_trend(&LedgerTables::default(), TrendWindow::Last3Months).is_empty());
}

#[test]
fn trend_window_from_tag() {
    assert_eq!(TrendWindow::from_tag(Some("last_6_months")), TrendWindow::Last6Months);
    assert_eq!(TrendWindow::from_tag(Some("last_12_months")), TrendWindow::Last12Months);
    assert_eq!(TrendWindow::from_tag(Some("ytd")), TrendWindow::Last3Months);
    assert_eq!(TrendWindow::from_tag(None), TrendWindow::Last3Months);
    assert_eq!(TrendWindow::Last6Months.months(), 6);
    assert_eq!(TrendWindow::Last12Months.tag(), "last_12_months");
}

#[test]
fn runway_needs_three_cash_records() {
    let mut t = setup();
    t.cash = vec![cash("2023-01", 1_000), cash("2023-02", 900)];
    let r = cash_runway(&t);
    assert_eq!(r.current_cash, Decimal::ZERO);
    assert_eq!(r.avg_monthly_burn, Decimal::ZERO);
    assert_eq!(r.runway_months, Decimal::ZERO);
}

#[test]
fn runway_averages_the_last_three_burns() {
    let mut t = setup();
    // unsorted on purpose; the first burn (2000) falls outside the window
    t.cash = vec![
        cash("2023-03", 7_000),
        cash("2023-01", 10_000),
        cash("2023-05", 5_500),
        cash("2023-02", 8_000),
        cash("2023-04", 6_000),
    ];
    let r = cash_runway(&t);
    assert_eq!(r.current_cash, d(5_500));
    // burns: 2000, 1000, 1000, 500 -> last three average to 2500/3
    assert_eq!(r.avg_monthly_burn, d(2_500) / d(3));
    assert_eq!(r.runway_months, d(5_500) / (d(2_500) / d(3)));
}

#[test]
fn runway_with_three_records_uses_two_burns() {
    let mut t = setup();
    t.cash = vec![cash("2023-01", 300), cash("2023-02", 200), cash("2023-03", 150)];
    let r = cash_runway(&t);
    assert_eq!(r.avg_monthly_burn, d(75));
    assert_eq!(r.runway_months, d(2));
}

#[test]
fn runway_is_zero_when_cash_is_growing() {
    let mut t = setup();
    t.cash = vec![cash("2023-01", 100), cash("2023-02", 200), cash("2023-03", 300)];
    let r = cash_runway(&t);
    assert_eq!(r.current_cash, d(300));
    assert!(r.avg_monthly_burn < Decimal::ZERO);
    assert_eq!(r.runway_months, Decimal::ZERO);
}

#[test]
fn cash_trend_reports_month_over_month_change() {
    let mut t = setup();
    t.cash = vec![cash("2023-02", 80), cash("2023-01", 100), cash("2023-03", 95)];
    let rows = cash_trend(&t, 2);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].month, "2023-02");
    assert_eq!(rows[0].change, Decimal::ZERO);
    assert_eq!(rows[1].change, d(15));
}
