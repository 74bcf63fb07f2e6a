// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::ParsedIdentity;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod columns {
    pub const DATE: &str = "Date";
    pub const AD_NAME: &str = "Ad Name";
    pub const CHANNEL_ID: &str = "Custom Channel ID";
    pub const ROAS: &str = "ROAS";
    pub const SPEND: &str = "Spend (USD)";
    pub const REVENUE: &str = "Revenue (USD)";
    pub const PROFIT: &str = "Profit (USD)";

    pub const AD_SET_ID: &str = "Ad Set ID";
    pub const CURRENT_BUDGET: &str = "Current Budget (ILS)";
    pub const CURRENT_STATUS: &str = "Current Status";

    pub const NEW_BUDGET: &str = "New Budget";
    pub const NEW_STATUS: &str = "New Status";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Short rows leave their trailing cells absent.
    pub fn from_rows<H, R, C>(header: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let columns: Vec<String> = header.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|cells| {
                columns
                    .iter()
                    .cloned()
                    .zip(cells.into_iter().map(|c| -> String { c.into() }))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub date: Option<NaiveDate>,
    pub ad_name: String,
    pub channel_id: String,
    pub spend: Decimal,
    pub revenue: Decimal,
    /// Always `revenue - spend`; the sheet's own profit column is ignored.
    pub profit: Decimal,
    pub reported_ratio: Option<String>,
    pub identity: ParsedIdentity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControlRecord {
    pub ad_name: String,
    pub ad_set_id: String,
    pub current_budget: Decimal,
    pub current_status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    SingleDate,
    Range,
}

impl ViewMode {
    pub fn has_baselines(self) -> bool {
        matches!(self, ViewMode::SingleDate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    pub ad_name: String,
    pub channel_id: String,
    pub identity: ParsedIdentity,
    pub spend: Decimal,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub ratio: Decimal,
    pub baseline_1: Option<Decimal>,
    pub baseline_2: Option<Decimal>,
    pub ad_set_id: String,
    pub current_budget: Decimal,
    pub current_status: Option<String>,
    pub proposed_budget: Decimal,
    pub proposed_status: Option<String>,
}

impl ViewRow {
    pub(crate) fn from_totals(
        ad_name: String,
        channel_id: String,
        identity: ParsedIdentity,
        spend: Decimal,
        revenue: Decimal,
    ) -> Self {
        Self {
            ad_name,
            channel_id,
            identity,
            spend,
            revenue,
            profit: crate::utils::saturating_sub(revenue, spend),
            ratio: crate::ratio::compute_ratio(revenue, spend),
            baseline_1: None,
            baseline_2: None,
            ad_set_id: String::new(),
            current_budget: Decimal::ZERO,
            current_status: None,
            proposed_budget: Decimal::ZERO,
            proposed_status: None,
        }
    }

    /// Stable identity for a row: the ad-set id, or a composite of name and
    /// channel when the control sheet has no id for it.
    pub fn key(&self) -> String {
        if self.ad_set_id.is_empty() {
            format!("{}|{}", self.ad_name, self.channel_id)
        } else {
            self.ad_set_id.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub mode: ViewMode,
    pub rows: Vec<ViewRow>,
}

impl View {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
