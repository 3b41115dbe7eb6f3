// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based intent classification.
//!
//! Queries are lower-cased and matched against ordered regex tables. Order is
//! significant everywhere: the first month pattern, the first period pattern
//! and the first operation with a matching pattern win.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    RevenueVsBudget,
    GrossMarginTrend,
    OpexBreakdown,
    CashRunway,
    EbitdaAnalysis,
    GeneralQuery,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::RevenueVsBudget => "revenue_vs_budget",
            Operation::GrossMarginTrend => "gross_margin_trend",
            Operation::OpexBreakdown => "opex_breakdown",
            Operation::CashRunway => "cash_runway",
            Operation::EbitdaAnalysis => "ebitda_analysis",
            Operation::GeneralQuery => "general_query",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time window mentioned in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TimePeriod {
    LastMonths(u64),
    YearToDate,
}

impl TimePeriod {
    pub fn tag(&self) -> String {
        match self {
            TimePeriod::LastMonths(n) => format!("last_{n}_months"),
            TimePeriod::YearToDate => "ytd".to_string(),
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl TryFrom<String> for TimePeriod {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        if tag == "ytd" {
            return Ok(TimePeriod::YearToDate);
        }
        tag.strip_prefix("last_")
            .and_then(|rest| rest.strip_suffix("_months"))
            .and_then(|n| n.parse::<u64>().ok())
            .map(TimePeriod::LastMonths)
            .ok_or_else(|| format!("unknown time period '{tag}'"))
    }
}

impl From<TimePeriod> for String {
    fn from(p: TimePeriod) -> Self {
        p.tag()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub month: Option<String>,
    pub time_period: Option<TimePeriod>,
    pub original_query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub operation: Operation,
    #[serde(flatten)]
    pub params: QueryParams,
}

fn re(p: &str) -> Regex {
    // patterns are compile-time literals
    Regex::new(p).unwrap_or_else(|e| panic!("bad built-in pattern {p}: {e}"))
}

/// Operation table, in precedence order.
static OPERATION_RULES: Lazy<Vec<(Operation, Vec<Regex>)>> = Lazy::new(|| {
    let table: [(Operation, &[&str]); 5] = [
        (
            Operation::RevenueVsBudget,
            &[
                r"revenue.*vs.*budget",
                r"revenue.*budget",
                r"sales.*vs.*budget",
                r"sales.*budget",
                r"what.*revenue.*budget",
                r"revenue.*actual.*budget",
            ],
        ),
        (
            Operation::GrossMarginTrend,
            &[
                r"gross.*margin.*trend",
                r"margin.*trend",
                r"gross.*margin.*last",
                r"margin.*last.*months",
                r"show.*gross.*margin",
                r"gross.*margin.*chart",
            ],
        ),
        (
            Operation::OpexBreakdown,
            &[
                r"opex.*breakdown",
                r"opex.*category",
                r"operating.*expense.*breakdown",
                r"expense.*breakdown",
                r"opex.*by.*category",
                r"break.*down.*opex",
            ],
        ),
        (
            Operation::CashRunway,
            &[
                r"cash.*runway",
                r"runway",
                r"cash.*burn",
                r"how.*long.*cash",
                r"months.*cash",
                r"cash.*left",
            ],
        ),
        (
            Operation::EbitdaAnalysis,
            &[r"ebitda", r"profitability", r"earnings", r"operating.*profit"],
        ),
    ];
    table
        .into_iter()
        .map(|(op, pats)| (op, pats.iter().map(|p| re(p)).collect()))
        .collect()
});

/// Month names map onto one fixed reference year, whatever year the query
/// mentions. Names are scanned before the numeric form.
pub const REFERENCE_YEAR: u32 = 2023;

static MONTH_NAMES: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    [
        r"january|jan",
        r"february|feb",
        r"march|mar",
        r"april|apr",
        r"may",
        r"june|jun",
        r"july|jul",
        r"august|aug",
        r"september|sep",
        r"october|oct",
        r"november|nov",
        r"december|dec",
    ]
    .iter()
    .enumerate()
    .map(|(i, p)| (re(p), format!("{REFERENCE_YEAR}-{:02}", i + 1)))
    .collect()
});

static NUMERIC_MONTH: Lazy<Regex> = Lazy::new(|| re(r"(\d{4}-\d{2})"));
static LAST_N_MONTHS: Lazy<Regex> = Lazy::new(|| re(r"last\s+(\d+)\s+months?"));
static LAST_WORD_MONTHS: Lazy<Regex> =
    Lazy::new(|| re(r"last\s+(three|six|twelve)\s+months?"));
static YEAR_TO_DATE: Lazy<Regex> = Lazy::new(|| re(r"year\s+to\s+date|ytd"));

/// Stateless; every method is a pure function of the query text.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, query: &str) -> Classification {
        let lower = query.to_lowercase();
        let params = QueryParams {
            month: extract_month(&lower),
            time_period: extract_time_period(&lower),
            original_query: query.to_string(),
        };
        let operation = match_operation(&lower);
        debug!(
            operation = %operation,
            month = ?params.month,
            time_period = ?params.time_period,
            "classified query"
        );
        Classification { operation, params }
    }
}

fn match_operation(lower: &str) -> Operation {
    OPERATION_RULES
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| p.is_match(lower)))
        .map(|(op, _)| *op)
        .unwrap_or(Operation::GeneralQuery)
}

/// `YYYY-MM` from a month name, else from a literal `YYYY-MM` in the text.
pub fn extract_month(lower: &str) -> Option<String> {
    if let Some((_, month)) = MONTH_NAMES.iter().find(|(p, _)| p.is_match(lower)) {
        return Some(month.clone());
    }
    NUMERIC_MONTH
        .captures(lower)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_time_period(lower: &str) -> Option<TimePeriod> {
    if let Some(n) = LAST_N_MONTHS
        .captures(lower)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
    {
        return Some(TimePeriod::LastMonths(n));
    }
    if let Some(word) = LAST_WORD_MONTHS.captures(lower).and_then(|c| c.get(1)) {
        let n = match word.as_str() {
            "three" => 3,
            "six" => 6,
            _ => 12,
        };
        return Some(TimePeriod::LastMonths(n));
    }
    if YEAR_TO_DATE.is_match(lower) {
        return Some(TimePeriod::YearToDate);
    }
    None
}
