// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const REVENUE: &str = "Revenue";
pub const COGS: &str = "COGS";
pub const OPEX_PREFIX: &str = "Opex:";

/// Rows that belong to a `YYYY-MM` month.
pub trait MonthKeyed {
    fn month(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub month: String, // YYYY-MM
    pub account_category: String,
    pub amount: Decimal,
}

impl LedgerRecord {
    pub fn new(month: &str, account_category: &str, amount: Decimal) -> Self {
        Self {
            month: month.to_string(),
            account_category: account_category.to_string(),
            amount,
        }
    }

    pub fn is_opex(&self) -> bool {
        self.account_category.starts_with(OPEX_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashRecord {
    pub month: String,
    pub cash_usd: Decimal,
}

impl CashRecord {
    pub fn new(month: &str, cash_usd: Decimal) -> Self {
        Self {
            month: month.to_string(),
            cash_usd,
        }
    }
}

/// Exchange rate row. Carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRecord {
    pub month: String,
    pub currency: String,
    pub rate_to_usd: Decimal,
}

impl MonthKeyed for LedgerRecord {
    fn month(&self) -> &str {
        &self.month
    }
}

impl MonthKeyed for CashRecord {
    fn month(&self) -> &str {
        &self.month
    }
}

impl MonthKeyed for FxRecord {
    fn month(&self) -> &str {
        &self.month
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub revenue_actual: Decimal,
    pub revenue_budget: Decimal,
    pub cogs_actual: Decimal,
    pub cogs_budget: Decimal,
    pub opex_actual: Decimal,
    pub opex_budget: Decimal,
    pub gross_margin_actual: Decimal,
    pub gross_margin_budget: Decimal,
    pub ebitda_actual: Decimal,
    pub ebitda_budget: Decimal,
    pub cash: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpexRow {
    pub category: String,
    pub actual: Decimal,
    pub budget: Decimal,
    pub variance: Decimal,
    pub variance_pct: Decimal,
}

impl OpexRow {
    /// Category name without the `Opex:` prefix.
    pub fn display_name(&self) -> &str {
        self.category
            .strip_prefix(OPEX_PREFIX)
            .unwrap_or(&self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginPoint {
    pub month: String,
    pub actual: Decimal,
    pub budget: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunwayEstimate {
    pub current_cash: Decimal,
    pub avg_monthly_burn: Decimal,
    pub runway_months: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashTrendRow {
    pub month: String,
    pub cash_usd: Decimal,
    pub change: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub dashed: bool,
}

/// Plot-ready data handed to whatever renders the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    GroupedBar {
        categories: Vec<String>,
        series: Vec<Series>,
    },
    Line {
        x: Vec<String>,
        series: Vec<LineSeries>,
    },
    Waterfall {
        categories: Vec<String>,
        values: Vec<f64>,
    },
}
