// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ControlRecord, RawTable, View, columns};
use crate::normalize::cell;
use crate::utils::coerce_number;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// Sheets sometimes keep ids as text with a leading apostrophe.
pub fn clean_ad_set_id(raw: &str) -> String {
    raw.trim().replace('\'', "")
}

pub fn normalize_controls(table: &RawTable) -> Vec<ControlRecord> {
    table
        .rows
        .iter()
        .map(|row| ControlRecord {
            ad_name: cell(row, columns::AD_NAME).unwrap_or("").to_string(),
            ad_set_id: clean_ad_set_id(cell(row, columns::AD_SET_ID).unwrap_or("")),
            current_budget: coerce_number(cell(row, columns::CURRENT_BUDGET)),
            current_status: cell(row, columns::CURRENT_STATUS)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
        .collect()
}

/// Left join on ad name. Rows without a control record keep budget 0 and an
/// unset status; the first control record wins on duplicate names.
pub fn merge_controls(mut view: View, controls: &[ControlRecord]) -> View {
    let mut by_name: HashMap<&str, &ControlRecord> = HashMap::new();
    for c in controls {
        by_name.entry(c.ad_name.as_str()).or_insert(c);
    }

    let mut unmatched = 0usize;
    for row in &mut view.rows {
        match by_name.get(row.ad_name.as_str()) {
            Some(c) => {
                row.ad_set_id = c.ad_set_id.clone();
                row.current_budget = c.current_budget;
                row.current_status = c.current_status.clone();
            }
            None => {
                unmatched += 1;
                row.ad_set_id = String::new();
                row.current_budget = Decimal::ZERO;
                row.current_status = None;
            }
        }
        row.proposed_budget = Decimal::ZERO;
        row.proposed_status = None;
    }
    if unmatched > 0 {
        debug!(unmatched, "view rows without a control record");
    }
    view
}
