// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::{self, ParsedIdentity};
use crate::models::{PerformanceRecord, RawTable, columns};
use crate::utils::{coerce_number, saturating_sub};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// What normalisation had to paper over. Nothing here is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub rows: usize,
    pub degraded_names: Vec<String>,
    pub invalid_dates: usize,
    pub backfilled_channels: usize,
}

pub(crate) fn cell<'a>(row: &'a HashMap<String, String>, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str)
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

pub fn normalize(table: &RawTable) -> (Vec<PerformanceRecord>, NormalizeReport) {
    let has_channel_column = table.has_column(columns::CHANNEL_ID);
    let mut report = NormalizeReport {
        rows: table.rows.len(),
        ..Default::default()
    };

    let records = table
        .rows
        .iter()
        .map(|row| {
            let ad_name = cell(row, columns::AD_NAME).unwrap_or("").to_string();
            let identity = ParsedIdentity::parse(&ad_name);
            if identity.is_degraded() {
                debug!(ad_name = %ad_name, "ad name does not follow naming convention");
                report.degraded_names.push(ad_name.clone());
            }

            let date = match non_blank(cell(row, columns::DATE)) {
                Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    Ok(d) => Some(d),
                    Err(_) => {
                        report.invalid_dates += 1;
                        None
                    }
                },
                None => {
                    report.invalid_dates += 1;
                    None
                }
            };

            let channel_id = match non_blank(cell(row, columns::CHANNEL_ID)) {
                Some(c) if has_channel_column => c.to_string(),
                _ => {
                    if has_channel_column {
                        report.backfilled_channels += 1;
                    }
                    identity::channel_id(&ad_name)
                }
            };

            let spend = coerce_number(cell(row, columns::SPEND));
            let revenue = coerce_number(cell(row, columns::REVENUE));

            PerformanceRecord {
                date,
                ad_name,
                channel_id,
                spend,
                revenue,
                profit: saturating_sub(revenue, spend),
                reported_ratio: non_blank(cell(row, columns::ROAS)).map(str::to_string),
                identity,
            }
        })
        .collect();

    if !report.degraded_names.is_empty() {
        warn!(
            count = report.degraded_names.len(),
            "ad names did not match the naming convention; sentinels used"
        );
    }
    if report.invalid_dates > 0 {
        warn!(count = report.invalid_dates, "rows with a missing or invalid date");
    }
    (records, report)
}
