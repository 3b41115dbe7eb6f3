// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

/// Accepts `YYYY-MM` or a full `YYYY-MM-DD` date and returns `YYYY-MM`.
pub fn normalize_month(raw: &str) -> Option<String> {
    let s = raw.trim();
    let candidate = match s.len() {
        7 => s,
        10 if chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => &s[..7],
        // spreadsheet exports sometimes carry a midnight timestamp
        19 if chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok() => &s[..7],
        _ => return None,
    };
    parse_month(candidate).ok()
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s.trim().replace(',', "");
    cleaned
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}

fn round_half_up(d: Decimal, dp: u32) -> Decimal {
    let r = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    // keeps "-0" out of rendered output
    if r.is_zero() { Decimal::ZERO } else { r }
}

/// `$12,345` with whole-dollar rounding.
pub fn fmt_usd(d: Decimal) -> String {
    let r = round_half_up(d, 0);
    let sign = if r.is_sign_negative() { "-" } else { "" };
    format!(
        "{sign}${}",
        format_num::format_num!(",.0f", to_f64(r.abs()))
    )
}

/// `+$10,000` / `-$2,500` / `$0`.
pub fn fmt_signed_usd(d: Decimal) -> String {
    let r = round_half_up(d, 0);
    if r > Decimal::ZERO {
        format!("+{}", fmt_usd(r))
    } else {
        fmt_usd(r)
    }
}

/// One decimal place, e.g. `60.0`.
pub fn fmt_1dp(d: Decimal) -> String {
    format!("{:.1}", to_f64(round_half_up(d, 1)))
}

/// One decimal place with an explicit sign, e.g. `+11.1`.
pub fn fmt_signed_1dp(d: Decimal) -> String {
    format!("{:+.1}", to_f64(round_half_up(d, 1)))
}

pub fn fmt_pct(d: Decimal) -> String {
    format!("{}%", fmt_1dp(d))
}

pub fn fmt_signed_pct(d: Decimal) -> String {
    format!("{}%", fmt_signed_1dp(d))
}

/// `last_3_months` -> `Last 3 Months`.
pub fn title_case_tag(tag: &str) -> String {
    tag.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
