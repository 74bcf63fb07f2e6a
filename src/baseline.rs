// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::FormatError;
use crate::models::{PerformanceRecord, View, ViewMode, ViewRow};
use crate::ratio::{compute_ratio, reported_ratio};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Records of one day indexed by trimmed channel id. The first record wins
/// when a channel appears more than once on that day.
fn index_day(records: &[PerformanceRecord], day: NaiveDate) -> HashMap<&str, &PerformanceRecord> {
    let mut out = HashMap::new();
    for r in records.iter().filter(|r| r.date == Some(day)) {
        out.entry(r.channel_id.trim()).or_insert(r);
    }
    out
}

/// ROAS a prior-day record contributes as a baseline: its reported value
/// when the sheet has one, otherwise revenue / spend.
pub fn baseline_value(record: &PerformanceRecord) -> Result<Decimal, FormatError> {
    match record.reported_ratio.as_deref() {
        Some(raw) => reported_ratio(raw),
        None => Ok(compute_ratio(record.revenue, record.spend)),
    }
}

fn lookup(
    index: &HashMap<&str, &PerformanceRecord>,
    channel_id: &str,
) -> Result<Option<Decimal>, FormatError> {
    index.get(channel_id).map(|r| baseline_value(r)).transpose()
}

pub fn single_date_view(
    records: &[PerformanceRecord],
    date: NaiveDate,
) -> Result<View, FormatError> {
    let prev = index_day(records, date - Duration::days(1));
    let prev2 = index_day(records, date - Duration::days(2));

    let mut rows = Vec::new();
    for r in records.iter().filter(|r| r.date == Some(date)) {
        let channel_id = r.channel_id.trim().to_string();
        let mut row = ViewRow::from_totals(
            r.ad_name.clone(),
            channel_id.clone(),
            r.identity.clone(),
            r.spend,
            r.revenue,
        );
        row.baseline_1 = lookup(&prev, &channel_id)?;
        row.baseline_2 = lookup(&prev2, &channel_id)?;
        rows.push(row);
    }

    Ok(View {
        mode: ViewMode::SingleDate,
        rows,
    })
}
