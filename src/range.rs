// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use crate::identity::ParsedIdentity;
use crate::models::{PerformanceRecord, View, ViewMode, ViewRow};
use crate::utils::saturating_add;
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Grouping key for range mode. Distinct ads that share a channel stay
/// separate because the ad name is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityKey {
    pub ad_name: String,
    pub channel_id: String,
    pub account: String,
    pub domain: String,
    pub buying_method: String,
    pub category: String,
    pub locale: String,
}

impl IdentityKey {
    pub fn of(r: &PerformanceRecord) -> Self {
        Self {
            ad_name: r.ad_name.clone(),
            channel_id: r.channel_id.clone(),
            account: r.identity.account.clone(),
            domain: r.identity.domain.clone(),
            buying_method: r.identity.buying_method.clone(),
            category: r.identity.category.clone(),
            locale: r.identity.locale.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sums {
    pub spend: Decimal,
    pub revenue: Decimal,
    pub profit: Decimal,
}

/// Per-identity sums over `[start, end]`, both ends inclusive.
pub fn aggregate(
    records: &[PerformanceRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> BTreeMap<IdentityKey, (ParsedIdentity, Sums)> {
    let mut groups: BTreeMap<IdentityKey, (ParsedIdentity, Sums)> = BTreeMap::new();
    for r in records {
        let Some(date) = r.date else { continue };
        if date < start || date > end {
            continue;
        }
        let entry = groups
            .entry(IdentityKey::of(r))
            .or_insert_with(|| (r.identity.clone(), Sums::default()));
        let sums = &mut entry.1;
        sums.spend = saturating_add(sums.spend, r.spend);
        sums.revenue = saturating_add(sums.revenue, r.revenue);
        sums.profit = saturating_add(sums.profit, r.profit);
    }
    groups
}

pub fn range_view(records: &[PerformanceRecord], start: NaiveDate, end: NaiveDate) -> View {
    let rows = aggregate(records, start, end)
        .into_iter()
        .map(|(key, (identity, sums))| {
            ViewRow::from_totals(key.ad_name, key.channel_id, identity, sums.spend, sums.revenue)
        })
        .collect();
    View {
        mode: ViewMode::Range,
        rows,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Last7Days,
    Last14Days,
    Last30Days,
    ThisMonth,
    LastMonth,
}

impl DatePreset {
    pub const NAMES: [&'static str; 5] = [
        "last-7-days",
        "last-14-days",
        "last-30-days",
        "this-month",
        "last-month",
    ];

    pub fn resolve(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let first_of_month = today.with_day(1).unwrap_or(today);
        match self {
            DatePreset::Last7Days => (today - Duration::days(6), today),
            DatePreset::Last14Days => (today - Duration::days(13), today),
            DatePreset::Last30Days => (today - Duration::days(29), today),
            DatePreset::ThisMonth => (first_of_month, today),
            DatePreset::LastMonth => {
                let last_prev = first_of_month - Duration::days(1);
                (last_prev.with_day(1).unwrap_or(last_prev), last_prev)
            }
        }
    }
}

impl FromStr for DatePreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-7-days" => Ok(DatePreset::Last7Days),
            "last-14-days" => Ok(DatePreset::Last14Days),
            "last-30-days" => Ok(DatePreset::Last30Days),
            "this-month" => Ok(DatePreset::ThisMonth),
            "last-month" => Ok(DatePreset::LastMonth),
            other => Err(format!(
                "Unknown preset '{}' (use {})",
                other,
                Self::NAMES.join("|")
            )),
        }
    }
}

pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}
