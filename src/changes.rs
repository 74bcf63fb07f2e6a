// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{View, ViewRow};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

pub const BUDGET_DEADBAND: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proposal {
    pub budget: Decimal,
    pub status: Option<String>,
}

impl Proposal {
    pub fn of(row: &ViewRow) -> Self {
        Self {
            budget: row.proposed_budget,
            status: row.proposed_status.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldChanges {
    /// Minor currency units (cents).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_budget: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl FieldChanges {
    pub fn is_empty(&self) -> bool {
        self.daily_budget.is_none() && self.status.is_none()
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(b) = self.daily_budget {
            out.push(("daily_budget", b.to_string()));
        }
        if let Some(s) = &self.status {
            out.push(("status", s.clone()));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationRequest {
    pub target_id: String,
    pub label: String,
    pub changes: FieldChanges,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    Submit(MutationRequest),
    Unchanged,
    NoValidTarget { label: String, changes: FieldChanges },
}

pub fn budget_changed(proposed: Decimal, current: Decimal) -> bool {
    if proposed <= Decimal::ZERO {
        return false;
    }
    match proposed.checked_sub(current) {
        Some(delta) => delta.abs() >= BUDGET_DEADBAND,
        None => true,
    }
}

fn normalize_status(s: &str) -> String {
    s.trim().to_uppercase()
}

pub fn status_changed(proposed: Option<&str>, current: Option<&str>) -> bool {
    match proposed.map(normalize_status).filter(|s| !s.is_empty()) {
        Some(p) => p != normalize_status(current.unwrap_or("")),
        None => false,
    }
}

/// `round(value * 100)`, halves to even. `None` when it does not fit an `i64`.
pub fn minor_units(value: Decimal) -> Option<i64> {
    value
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
}

pub fn detect_change(row: &ViewRow, proposal: &Proposal) -> Decision {
    let mut changes = FieldChanges::default();
    if budget_changed(proposal.budget, row.current_budget) {
        changes.daily_budget = minor_units(proposal.budget);
        if changes.daily_budget.is_none() {
            warn!(ad_name = %row.ad_name, budget = %proposal.budget, "budget out of range; ignored");
        }
    }
    if status_changed(proposal.status.as_deref(), row.current_status.as_deref()) {
        changes.status = proposal.status.clone();
    }

    if changes.is_empty() {
        return Decision::Unchanged;
    }
    if row.ad_set_id.trim().is_empty() {
        return Decision::NoValidTarget {
            label: row.ad_name.clone(),
            changes,
        };
    }
    Decision::Submit(MutationRequest {
        target_id: row.ad_set_id.trim().to_string(),
        label: row.ad_name.clone(),
        changes,
    })
}

pub fn apply_proposals(mut view: View, proposals: &HashMap<String, Proposal>) -> View {
    for row in &mut view.rows {
        if let Some(p) = proposals.get(&row.ad_name) {
            row.proposed_budget = p.budget;
            row.proposed_status = p.status.clone();
        }
    }
    view
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub requests: Vec<MutationRequest>,
    pub no_target: Vec<(String, FieldChanges)>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.no_target.is_empty()
    }
}

pub fn build_batch(rows: &[ViewRow]) -> Batch {
    let mut batch = Batch::default();
    for row in rows {
        match detect_change(row, &Proposal::of(row)) {
            Decision::Submit(req) => batch.requests.push(req),
            Decision::NoValidTarget { label, changes } => batch.no_target.push((label, changes)),
            Decision::Unchanged => {}
        }
    }
    batch
}
