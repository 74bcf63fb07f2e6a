// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result as CoreResult};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use tracing::warn;

const UA: &str = concat!(
    "adpilot/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/adpilot)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(s.trim().to_string()))
}

/// Lenient numeric parse used for sheet cells: plain or scientific notation.
pub fn parse_number(s: &str) -> Option<Decimal> {
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Cell value coerced to a number; blanks and garbage become zero.
pub fn coerce_number(raw: Option<&str>) -> Decimal {
    raw.and_then(|s| parse_number(s.trim()))
        .unwrap_or(Decimal::ZERO)
}

// Sheet cells are unbounded; sums pin to the Decimal range instead of panicking.
pub fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        warn!(%a, %b, "decimal overflow; value clamped");
        if b.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

pub fn saturating_sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| {
        warn!(%a, %b, "decimal overflow; value clamped");
        if b.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("${:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    styled_table(
        headers,
        rows.into_iter()
            .map(|r| r.into_iter().map(Cell::new).collect())
            .collect(),
    )
}

pub fn styled_table(headers: &[&str], rows: Vec<Vec<Cell>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r);
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
