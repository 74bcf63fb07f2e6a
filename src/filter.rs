// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{View, ViewRow};
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;

pub const ALL: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// `None`, blank and `"All"` mean no restriction.
    pub fn from_option(v: Option<&str>) -> Self {
        match v {
            Some(s) if !s.is_empty() && s != ALL => Selection::Only(s.to_string()),
            _ => Selection::All,
        }
    }

    fn admits(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(want) => want == value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Paused,
}

impl StatusFilter {
    fn admits(self, effective: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => effective == "ACTIVE",
            StatusFilter::Paused => effective == "PAUSED",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "ALL" => Ok(StatusFilter::All),
            "ACTIVE" => Ok(StatusFilter::Active),
            "PAUSED" => Ok(StatusFilter::Paused),
            other => Err(format!("Unknown status filter '{}' (use all|active|paused)", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub account: Selection,
    pub status: StatusFilter,
    pub category: Selection,
    pub domain: Selection,
    pub locale: Selection,
}

impl Filters {
    pub fn admits(&self, row: &ViewRow) -> bool {
        self.account.admits(&row.identity.account)
            && self.status.admits(&effective_status(row))
            && self.category.admits(&row.identity.category)
            && self.domain.admits(&row.identity.domain)
            && self.locale.admits(&row.identity.locale)
    }

    /// Keeps matching rows, ordered by (channel id, ad name). The sort is
    /// stable so ties keep their incoming order.
    pub fn apply(&self, mut view: View) -> View {
        view.rows.retain(|r| self.admits(r));
        view.rows
            .sort_by(|a, b| (&a.channel_id, &a.ad_name).cmp(&(&b.channel_id, &b.ad_name)));
        view
    }
}

/// Pending operator choice if any, else the last known platform status;
/// upper-cased, trimmed, and empty for textual nulls.
pub fn effective_status(row: &ViewRow) -> String {
    let raw = row
        .proposed_status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(row.current_status.as_deref())
        .unwrap_or("");
    let s = raw.trim().to_uppercase();
    match s.as_str() {
        "NONE" | "NAN" => String::new(),
        _ => s,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub accounts: Vec<String>,
    pub categories: Vec<String>,
    pub domains: Vec<String>,
    pub locales: Vec<String>,
}

fn options<'a>(values: impl Iterator<Item = &'a str>, skip_empty: bool) -> Vec<String> {
    let distinct: BTreeSet<&str> = values.filter(|v| !(skip_empty && v.is_empty())).collect();
    std::iter::once(ALL.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

pub fn filter_options(rows: &[ViewRow]) -> FilterOptions {
    FilterOptions {
        accounts: options(rows.iter().map(|r| r.identity.account.as_str()), true),
        categories: options(rows.iter().map(|r| r.identity.category.as_str()), false),
        domains: options(rows.iter().map(|r| r.identity.domain.as_str()), false),
        locales: options(rows.iter().map(|r| r.identity.locale.as_str()), false),
    }
}
