// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Query entry point: classify, compute, and phrase the answer.

use crate::error::{ComputationFailure, LedgerError};
use crate::intent::{Classification, IntentClassifier, Operation, QueryParams};
use crate::ledger::{LedgerSource, LedgerStore, LedgerTables};
use crate::metrics::{self, TrendWindow};
use crate::models::{
    ChartSpec, LineSeries, MarginPoint, MonthlySummary, OpexRow, RunwayEstimate, Series,
};
use crate::narrative::{self, Scope};
use crate::utils::{parse_month, to_f64};
use serde::Serialize;
use tracing::{debug, warn};

/// Numbers behind an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Analysis {
    Summary {
        month: Option<String>,
        summary: MonthlySummary,
    },
    Breakdown {
        month: Option<String>,
        rows: Vec<OpexRow>,
    },
    Trend {
        window: &'static str,
        points: Vec<MarginPoint>,
    },
    Runway {
        estimate: RunwayEstimate,
    },
    Overview {
        month: Option<String>,
        summary: MonthlySummary,
        runway: RunwayEstimate,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub operation: Operation,
    pub narrative: String,
    pub chart: Option<ChartSpec>,
    pub result: Option<Analysis>,
}

impl QueryResponse {
    fn text_only(operation: Operation, narrative: String) -> Self {
        Self {
            operation,
            narrative,
            chart: None,
            result: None,
        }
    }

    pub fn into_parts(self) -> (String, Option<ChartSpec>) {
        (self.narrative, self.chart)
    }
}

type Handler = fn(&LedgerTables, &QueryParams) -> Result<QueryResponse, ComputationFailure>;

fn handler_for(op: Operation) -> Handler {
    match op {
        Operation::RevenueVsBudget => revenue_vs_budget,
        Operation::GrossMarginTrend => gross_margin_trend,
        Operation::OpexBreakdown => opex_breakdown,
        Operation::CashRunway => cash_runway,
        Operation::EbitdaAnalysis => ebitda_analysis,
        Operation::GeneralQuery => overview,
    }
}

/// The question-answering front door.
pub struct Copilot {
    store: LedgerStore,
    classifier: IntentClassifier,
}

impl Copilot {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            classifier: IntentClassifier::new(),
        }
    }

    /// Loads the source up front; a source that cannot be read is fatal here.
    pub fn open(source: Box<dyn LedgerSource>) -> Result<Self, LedgerError> {
        Ok(Self::new(LedgerStore::open(source)?))
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LedgerStore {
        &mut self.store
    }

    pub fn classify(&self, text: &str) -> Classification {
        self.classifier.classify(text)
    }

    /// Narrative plus optional chart.
    pub fn process_query(&self, text: &str) -> (String, Option<ChartSpec>) {
        self.answer(text).into_parts()
    }

    /// Full response. Never fails: problems come back as an apology narrative
    /// with no chart.
    pub fn answer(&self, text: &str) -> QueryResponse {
        let Classification { operation, params } = self.classify(text);
        debug!(%operation, "dispatching query");
        let outcome = self
            .store
            .tables()
            .map_err(ComputationFailure::from)
            .and_then(|tables| handler_for(operation)(&tables, &params));
        match outcome {
            Ok(resp) => resp,
            Err(e) => {
                warn!(%operation, error = %e, "query failed");
                QueryResponse::text_only(operation, narrative::failure(&e.to_string()))
            }
        }
    }
}

fn resolve_scope(t: &LedgerTables, params: &QueryParams) -> Result<Scope, ComputationFailure> {
    match &params.month {
        Some(m) => {
            let m = parse_month(m)
                .map_err(|_| ComputationFailure::Invalid(format!("'{m}' is not a valid month")))?;
            Ok(Scope::Month(m))
        }
        None => Ok(latest_scope(t)),
    }
}

fn latest_scope(t: &LedgerTables) -> Scope {
    match t.latest_month() {
        Some(latest) => Scope::Latest(latest.to_string()),
        None => Scope::AllMonths,
    }
}

const WATERFALL_CATEGORIES: [&str; 4] = ["Revenue", "COGS", "Opex", "EBITDA"];

fn categories() -> Vec<String> {
    WATERFALL_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn revenue_vs_budget(
    t: &LedgerTables,
    params: &QueryParams,
) -> Result<QueryResponse, ComputationFailure> {
    let scope = resolve_scope(t, params)?;
    let s = metrics::monthly_summary(t, scope.month());
    let chart = ChartSpec::GroupedBar {
        categories: categories(),
        series: vec![
            Series {
                name: "Actual".into(),
                values: [s.revenue_actual, s.cogs_actual, s.opex_actual, s.ebitda_actual]
                    .into_iter()
                    .map(to_f64)
                    .collect(),
            },
            Series {
                name: "Budget".into(),
                values: [s.revenue_budget, s.cogs_budget, s.opex_budget, s.ebitda_budget]
                    .into_iter()
                    .map(to_f64)
                    .collect(),
            },
        ],
    };
    Ok(QueryResponse {
        operation: Operation::RevenueVsBudget,
        narrative: narrative::revenue_vs_budget(&s, &scope),
        chart: Some(chart),
        result: Some(Analysis::Summary {
            month: scope.month().map(str::to_string),
            summary: s,
        }),
    })
}

fn gross_margin_trend(
    t: &LedgerTables,
    params: &QueryParams,
) -> Result<QueryResponse, ComputationFailure> {
    let tag = params.time_period.map(|p| p.tag());
    let window = TrendWindow::from_tag(tag.as_deref());
    let points = metrics::gross_margin_trend(t, window);
    if points.is_empty() {
        return Ok(QueryResponse::text_only(
            Operation::GrossMarginTrend,
            narrative::no_margin_data(),
        ));
    }
    let chart = ChartSpec::Line {
        x: points.iter().map(|p| p.month.clone()).collect(),
        series: vec![
            LineSeries {
                name: "Actual".into(),
                values: points.iter().map(|p| to_f64(p.actual)).collect(),
                dashed: false,
            },
            LineSeries {
                name: "Budget".into(),
                values: points.iter().map(|p| to_f64(p.budget)).collect(),
                dashed: true,
            },
        ],
    };
    Ok(QueryResponse {
        operation: Operation::GrossMarginTrend,
        narrative: narrative::margin_trend(&points, window),
        chart: Some(chart),
        result: Some(Analysis::Trend {
            window: window.tag(),
            points,
        }),
    })
}

fn opex_breakdown(
    t: &LedgerTables,
    params: &QueryParams,
) -> Result<QueryResponse, ComputationFailure> {
    let scope = resolve_scope(t, params)?;
    let rows = metrics::opex_breakdown(t, scope.month());
    if rows.is_empty() {
        return Ok(QueryResponse::text_only(
            Operation::OpexBreakdown,
            narrative::no_opex_data(),
        ));
    }
    let chart = ChartSpec::GroupedBar {
        categories: rows.iter().map(|r| r.display_name().to_string()).collect(),
        series: vec![
            Series {
                name: "Actual".into(),
                values: rows.iter().map(|r| to_f64(r.actual)).collect(),
            },
            Series {
                name: "Budget".into(),
                values: rows.iter().map(|r| to_f64(r.budget)).collect(),
            },
        ],
    };
    Ok(QueryResponse {
        operation: Operation::OpexBreakdown,
        narrative: narrative::opex_breakdown(&rows, &scope),
        chart: Some(chart),
        result: Some(Analysis::Breakdown {
            month: scope.month().map(str::to_string),
            rows,
        }),
    })
}

fn cash_runway(
    t: &LedgerTables,
    _params: &QueryParams,
) -> Result<QueryResponse, ComputationFailure> {
    if t.cash.is_empty() {
        return Ok(QueryResponse::text_only(
            Operation::CashRunway,
            narrative::no_cash_data(),
        ));
    }
    let estimate = metrics::cash_runway(t);
    let chart = ChartSpec::Line {
        x: t.cash.iter().map(|c| c.month.clone()).collect(),
        series: vec![LineSeries {
            name: "Cash Balance".into(),
            values: t.cash.iter().map(|c| to_f64(c.cash_usd)).collect(),
            dashed: false,
        }],
    };
    Ok(QueryResponse {
        operation: Operation::CashRunway,
        narrative: narrative::cash_runway(&estimate),
        chart: Some(chart),
        result: Some(Analysis::Runway { estimate }),
    })
}

fn ebitda_analysis(
    t: &LedgerTables,
    params: &QueryParams,
) -> Result<QueryResponse, ComputationFailure> {
    let scope = resolve_scope(t, params)?;
    let s = metrics::monthly_summary(t, scope.month());
    let chart = ChartSpec::Waterfall {
        categories: categories(),
        values: [s.revenue_actual, -s.cogs_actual, -s.opex_actual, s.ebitda_actual]
            .into_iter()
            .map(to_f64)
            .collect(),
    };
    Ok(QueryResponse {
        operation: Operation::EbitdaAnalysis,
        narrative: narrative::ebitda(&s, &scope),
        chart: Some(chart),
        result: Some(Analysis::Summary {
            month: scope.month().map(str::to_string),
            summary: s,
        }),
    })
}

/// Always covers the latest month; month words picked out of a general
/// question ("summary" contains "mar") are ignored.
fn overview(t: &LedgerTables, _params: &QueryParams) -> Result<QueryResponse, ComputationFailure> {
    let scope = latest_scope(t);
    let summary = metrics::monthly_summary(t, scope.month());
    let runway = metrics::cash_runway(t);
    Ok(QueryResponse {
        operation: Operation::GeneralQuery,
        narrative: narrative::overview(&summary, &runway, &scope),
        chart: None,
        result: Some(Analysis::Overview {
            month: scope.month().map(str::to_string),
            summary,
            runway,
        }),
    })
}
