// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::baseline::single_date_view;
use crate::changes::{Proposal, apply_proposals};
use crate::control::{merge_controls, normalize_controls};
use crate::error::{Error, Result};
use crate::filter::{FilterOptions, Filters, filter_options};
use crate::models::View;
use crate::normalize::{NormalizeReport, normalize};
use crate::range::{check_range, range_view};
use crate::sources::{ControlSource, TableSource};
use crate::summary::Totals;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Day(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl Scope {
    fn label(&self) -> &'static str {
        match self {
            Scope::Day(_) => "date",
            Scope::Range { .. } => "range",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub view: View,
    /// Totals over every row in scope, before filters.
    pub summary: Totals,
    /// Totals over the rows that passed the filters.
    pub totals: Totals,
    pub options: FilterOptions,
    pub normalize: NormalizeReport,
}

pub struct Request<'a> {
    pub performance_sheet: &'a str,
    pub scope: Scope,
    pub filters: &'a Filters,
    pub proposals: &'a HashMap<String, Proposal>,
}

pub fn build_report(
    tables: &dyn TableSource,
    controls: &dyn ControlSource,
    req: &Request<'_>,
) -> Result<Report> {
    let raw = tables.read(req.performance_sheet);
    if raw.is_empty() {
        return Err(Error::EmptySource {
            name: req.performance_sheet.to_string(),
        });
    }
    let (records, normalize_report) = normalize(&raw);

    let view = match req.scope {
        Scope::Day(date) => single_date_view(&records, date)?,
        Scope::Range { start, end } => {
            check_range(start, end)?;
            range_view(&records, start, end)
        }
    };
    if view.is_empty() {
        return Err(Error::EmptySelection {
            scope: req.scope.label().to_string(),
        });
    }

    let control_table = controls.read();
    if control_table.is_empty() {
        warn!("control sheet is empty; budgets and statuses default to unset");
    }
    let view = merge_controls(view, &normalize_controls(&control_table));
    let view = apply_proposals(view, req.proposals);

    let summary = Totals::of(&view.rows);
    let options = filter_options(&view.rows);
    let view = req.filters.apply(view);
    let totals = Totals::of(&view.rows);
    info!(rows = view.rows.len(), mode = ?view.mode, "view built");

    Ok(Report {
        view,
        summary,
        totals,
        options,
        normalize: normalize_report,
    })
}
