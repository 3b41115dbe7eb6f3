// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The four ledger datasets and the load-once store that owns them.

use crate::db;
use crate::error::LedgerError;
use crate::models::{CashRecord, FxRecord, LedgerRecord, MonthKeyed};
use crate::utils::{normalize_month, parse_decimal};
use once_cell::sync::OnceCell;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DATASETS: [&str; 4] = ["actuals", "budget", "cash", "fx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ledger {
    Actuals,
    Budget,
}

/// Everything read from a source, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerTables {
    pub actuals: Vec<LedgerRecord>,
    pub budget: Vec<LedgerRecord>,
    pub cash: Vec<CashRecord>,
    pub fx: Vec<FxRecord>,
    /// Datasets the source did not provide at all.
    pub missing: Vec<&'static str>,
}

impl LedgerTables {
    pub fn ledger(&self, which: Ledger) -> &[LedgerRecord] {
        match which {
            Ledger::Actuals => &self.actuals,
            Ledger::Budget => &self.budget,
        }
    }

    /// Distinct months in actuals, first-seen order.
    pub fn months(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for r in &self.actuals {
            if !out.contains(&r.month) {
                out.push(r.month.clone());
            }
        }
        out
    }

    /// Greatest month present in actuals.
    pub fn latest_month(&self) -> Option<&str> {
        self.actuals.iter().map(|r| r.month.as_str()).max()
    }

    /// Cash rows ordered by month; ties keep source order.
    pub fn cash_sorted(&self) -> Vec<&CashRecord> {
        let mut rows: Vec<&CashRecord> = self.cash.iter().collect();
        rows.sort_by(|a, b| a.month.cmp(&b.month));
        rows
    }

    /// Last chronological cash record.
    pub fn latest_cash(&self) -> Option<&CashRecord> {
        latest(&self.cash)
    }
}

pub fn filter_by_month<'a, R: MonthKeyed>(rows: &'a [R], month: Option<&str>) -> Vec<&'a R> {
    match month {
        Some(m) => rows.iter().filter(|r| r.month() == m).collect(),
        None => rows.iter().collect(),
    }
}

/// Sum `value` per `key`. Keys come back sorted.
pub fn aggregate_sum<R, K, V>(rows: &[&R], key: K, value: V) -> BTreeMap<String, Decimal>
where
    K: Fn(&R) -> String,
    V: Fn(&R) -> Decimal,
{
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for r in rows.iter().copied() {
        *agg.entry(key(r)).or_insert(Decimal::ZERO) += value(r);
    }
    agg
}

/// The chronologically last row; among equal months the later row wins.
pub fn latest<'a, R: MonthKeyed + 'a>(rows: impl IntoIterator<Item = &'a R>) -> Option<&'a R> {
    rows.into_iter().fold(None, |best: Option<&R>, r| match best {
        Some(b) if b.month() > r.month() => Some(b),
        _ => Some(r),
    })
}

/// Something that can produce the four ledger datasets.
pub trait LedgerSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<LedgerTables, LedgerError>;
}

/// Picks a source for a path: directories hold CSV files, anything else is a
/// SQLite ledger database.
pub fn source_for_path(path: &Path) -> Box<dyn LedgerSource> {
    if path.is_dir() {
        Box::new(CsvDirSource::new(path))
    } else {
        Box::new(SqliteSource::new(path))
    }
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    month: String,
    account_category: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct CashRow {
    month: String,
    cash_usd: String,
}

#[derive(Debug, Deserialize)]
struct FxRow {
    month: String,
    currency: String,
    rate_to_usd: String,
}

fn month_of(dataset: &'static str, raw: &str) -> Result<String, LedgerError> {
    normalize_month(raw).ok_or_else(|| LedgerError::InvalidMonth {
        dataset,
        value: raw.to_string(),
    })
}

fn amount_of(dataset: &'static str, raw: &str) -> Result<Decimal, LedgerError> {
    parse_decimal(raw).map_err(|_| LedgerError::InvalidAmount {
        dataset,
        value: raw.to_string(),
    })
}

fn ledger_record(dataset: &'static str, row: LedgerRow) -> Result<LedgerRecord, LedgerError> {
    Ok(LedgerRecord {
        month: month_of(dataset, &row.month)?,
        account_category: row.account_category.trim().to_string(),
        amount: amount_of(dataset, &row.amount)?,
    })
}

fn cash_record(row: CashRow) -> Result<CashRecord, LedgerError> {
    Ok(CashRecord {
        month: month_of("cash", &row.month)?,
        cash_usd: amount_of("cash", &row.cash_usd)?,
    })
}

fn fx_record(row: FxRow) -> Result<FxRecord, LedgerError> {
    Ok(FxRecord {
        month: month_of("fx", &row.month)?,
        currency: row.currency.trim().to_uppercase(),
        rate_to_usd: amount_of("fx", &row.rate_to_usd)?,
    })
}

/// A directory holding `actuals.csv`, `budget.csv`, `cash.csv` and `fx.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read<T, R>(
        &self,
        dataset: &'static str,
        convert: impl Fn(T) -> Result<R, LedgerError>,
        missing: &mut Vec<&'static str>,
    ) -> Result<Vec<R>, LedgerError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let path = self.dir.join(format!("{dataset}.csv"));
        if !path.is_file() {
            warn!("{} not found; {} treated as empty", path.display(), dataset);
            missing.push(dataset);
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| LedgerError::Csv { dataset, source })?;
        let mut out = Vec::new();
        for result in rdr.deserialize::<T>() {
            let row = result.map_err(|source| LedgerError::Csv { dataset, source })?;
            out.push(convert(row)?);
        }
        debug!("read {} {} rows from {}", out.len(), dataset, path.display());
        Ok(out)
    }
}

impl LedgerSource for CsvDirSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.dir.display())
    }

    fn load(&self) -> Result<LedgerTables, LedgerError> {
        if !self.dir.is_dir() {
            return Err(LedgerError::SourceUnavailable {
                path: self.dir.clone(),
            });
        }
        let mut missing = Vec::new();
        let tables = LedgerTables {
            actuals: self.read("actuals", |r| ledger_record("actuals", r), &mut missing)?,
            budget: self.read("budget", |r| ledger_record("budget", r), &mut missing)?,
            cash: self.read("cash", cash_record, &mut missing)?,
            fx: self.read("fx", fx_record, &mut missing)?,
            missing,
        };
        if tables.missing.len() == DATASETS.len() {
            return Err(LedgerError::NoDatasets {
                source_name: self.describe(),
            });
        }
        Ok(tables)
    }
}

/// A SQLite file laid out by [`db::init_schema`].
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn has_table(conn: &Connection, name: &str) -> Result<bool, LedgerError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1",
            [name],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn query_rows<R>(
    conn: &Connection,
    dataset: &'static str,
    sql: &str,
    map: impl Fn(Vec<String>) -> Result<R, LedgerError>,
    missing: &mut Vec<&'static str>,
) -> Result<Vec<R>, LedgerError> {
    if !has_table(conn, dataset)? {
        warn!("table {} not found; treated as empty", dataset);
        missing.push(dataset);
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare(sql)?;
    let width = stmt.column_count();
    let rows = stmt.query_map([], |r| {
        (0..width)
            .map(|i| r.get::<_, String>(i))
            .collect::<rusqlite::Result<Vec<String>>>()
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(map(row?)?);
    }
    Ok(out)
}

fn take(cols: &mut Vec<String>) -> String {
    if cols.is_empty() {
        String::new()
    } else {
        cols.remove(0)
    }
}

impl LedgerSource for SqliteSource {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn load(&self) -> Result<LedgerTables, LedgerError> {
        if !self.path.is_file() {
            return Err(LedgerError::SourceUnavailable {
                path: self.path.clone(),
            });
        }
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut missing = Vec::new();
        let ledger = |dataset: &'static str| {
            move |mut c: Vec<String>| {
                ledger_record(
                    dataset,
                    LedgerRow {
                        month: take(&mut c),
                        account_category: take(&mut c),
                        amount: take(&mut c),
                    },
                )
            }
        };
        let tables = LedgerTables {
            actuals: query_rows(
                &conn,
                "actuals",
                db::SELECT_ACTUALS,
                ledger("actuals"),
                &mut missing,
            )?,
            budget: query_rows(
                &conn,
                "budget",
                db::SELECT_BUDGET,
                ledger("budget"),
                &mut missing,
            )?,
            cash: query_rows(
                &conn,
                "cash",
                db::SELECT_CASH,
                |mut c| {
                    cash_record(CashRow {
                        month: take(&mut c),
                        cash_usd: take(&mut c),
                    })
                },
                &mut missing,
            )?,
            fx: query_rows(
                &conn,
                "fx",
                db::SELECT_FX,
                |mut c| {
                    fx_record(FxRow {
                        month: take(&mut c),
                        currency: take(&mut c),
                        rate_to_usd: take(&mut c),
                    })
                },
                &mut missing,
            )?,
            missing,
        };
        if tables.missing.len() == DATASETS.len() {
            return Err(LedgerError::NoDatasets {
                source_name: self.describe(),
            });
        }
        Ok(tables)
    }
}

/// Tables held in process, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: LedgerTables,
}

impl MemorySource {
    pub fn new(tables: LedgerTables) -> Self {
        Self { tables }
    }
}

impl LedgerSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<LedgerTables, LedgerError> {
        Ok(self.tables.clone())
    }
}

/// Owns a source and the tables loaded from it.
///
/// The first call to [`LedgerStore::tables`] reads the source; later calls
/// share the same in-memory copy. `OnceCell` guarantees a single load even when
/// several threads ask at once.
pub struct LedgerStore {
    source: Box<dyn LedgerSource>,
    cache: OnceCell<Arc<LedgerTables>>,
}

impl LedgerStore {
    pub fn new(source: Box<dyn LedgerSource>) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    pub fn from_tables(tables: LedgerTables) -> Self {
        Self::new(Box::new(MemorySource::new(tables)))
    }

    /// Builds a store and loads it immediately so a bad source fails up front.
    pub fn open(source: Box<dyn LedgerSource>) -> Result<Self, LedgerError> {
        let store = Self::new(source);
        store.tables()?;
        Ok(store)
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    pub fn tables(&self) -> Result<Arc<LedgerTables>, LedgerError> {
        self.cache
            .get_or_try_init(|| {
                let tables = self.source.load()?;
                info!(
                    source = %self.source.describe(),
                    actuals = tables.actuals.len(),
                    budget = tables.budget.len(),
                    cash = tables.cash.len(),
                    fx = tables.fx.len(),
                    "ledger loaded"
                );
                Ok(Arc::new(tables))
            })
            .cloned()
    }

    /// Drops the cached tables and reads the source again.
    pub fn reload(&mut self) -> Result<Arc<LedgerTables>, LedgerError> {
        debug!("reloading {}", self.source.describe());
        self.cache.take();
        self.tables()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn latest_month(&self) -> Result<Option<String>, LedgerError> {
        Ok(self.tables()?.latest_month().map(str::to_string))
    }

    pub fn latest_cash(&self) -> Result<Option<CashRecord>, LedgerError> {
        Ok(self.tables()?.latest_cash().cloned())
    }

    pub fn months(&self) -> Result<Vec<String>, LedgerError> {
        Ok(self.tables()?.months())
    }
}
