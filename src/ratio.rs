// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::FormatError;
use comfy_table::{Cell, Color};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// `revenue / spend`, or zero when nothing was spent.
pub fn compute_ratio(revenue: Decimal, spend: Decimal) -> Decimal {
    if spend.is_zero() {
        return Decimal::ZERO;
    }
    revenue.checked_div(spend).unwrap_or(Decimal::ZERO)
}

pub fn clean_ratio(raw: &str) -> Result<Decimal, FormatError> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let stripped = if stripped.is_empty() { "0" } else { stripped };
    let value = crate::utils::parse_number(stripped).ok_or_else(|| FormatError {
        raw: raw.to_string(),
    })?;
    Ok(value / Decimal::ONE_HUNDRED)
}

pub fn clean_ratios<I, S>(values: I) -> Result<Vec<Decimal>, FormatError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values.into_iter().map(|v| clean_ratio(v.as_ref())).collect()
}

pub fn clean_ratio_map<K, S>(values: &BTreeMap<K, S>) -> Result<BTreeMap<K, Decimal>, FormatError>
where
    K: Ord + Clone,
    S: AsRef<str>,
{
    values
        .iter()
        .map(|(k, v)| Ok((k.clone(), clean_ratio(v.as_ref())?)))
        .collect()
}

/// Reported ROAS as found in a source cell. Percent text goes through
/// [`clean_ratio`]; a bare number is already a fraction.
pub fn reported_ratio(raw: &str) -> Result<Decimal, FormatError> {
    if raw.contains('%') {
        return clean_ratio(raw);
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    crate::utils::parse_number(trimmed).ok_or_else(|| FormatError {
        raw: raw.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Losing,
    Weak,
    BreakEven,
    Good,
    Strong,
}

impl Tier {
    /// Lower bounds are inclusive: `0.70` is `Weak`, `1.10` is `Good`.
    pub fn of(ratio: Decimal) -> Self {
        if ratio < Decimal::new(70, 2) {
            Tier::Losing
        } else if ratio < Decimal::new(95, 2) {
            Tier::Weak
        } else if ratio < Decimal::new(110, 2) {
            Tier::BreakEven
        } else if ratio < Decimal::new(140, 2) {
            Tier::Good
        } else {
            Tier::Strong
        }
    }

    pub fn color(self) -> Color {
        match self {
            Tier::Losing => Color::Rgb { r: 0xB3, g: 0x1B, b: 0x1B },
            Tier::Weak => Color::Rgb { r: 0xFD, g: 0xC1, b: 0xC5 },
            Tier::BreakEven => Color::Rgb { r: 0xFB, g: 0xEE, b: 0xAC },
            Tier::Good => Color::Rgb { r: 0x93, g: 0xC5, b: 0x72 },
            Tier::Strong => Color::Rgb { r: 0x01, g: 0x95, b: 0x29 },
        }
    }
}

pub fn tier_of(ratio: Decimal) -> Tier {
    Tier::of(ratio)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatioLabel {
    pub text: String,
    pub tier: Tier,
}

impl RatioLabel {
    pub fn to_cell(&self) -> Cell {
        Cell::new(&self.text).bg(self.tier.color()).fg(Color::Black)
    }
}

pub fn format_ratio(value: Option<Decimal>) -> Option<RatioLabel> {
    let value = value?;
    let pct = value.checked_mul(Decimal::ONE_HUNDRED)?.round_dp(0);
    Some(RatioLabel {
        text: format!("{}%", pct.normalize()),
        tier: Tier::of(value),
    })
}

pub fn format_ratio_text(raw: Option<&str>) -> Option<RatioLabel> {
    format_ratio(raw.and_then(|s| crate::utils::parse_number(s.trim())))
}

pub fn ratio_cell(value: Option<Decimal>) -> Cell {
    format_ratio(value)
        .map(|l| l.to_cell())
        .unwrap_or_else(|| Cell::new(""))
}
