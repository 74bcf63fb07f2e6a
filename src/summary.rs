// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ViewRow;
use crate::ratio::compute_ratio;
use crate::utils::saturating_add;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub spend: Decimal,
    pub revenue: Decimal,
    pub profit: Decimal,
    /// Total revenue over total spend, not an average of row ratios.
    pub ratio: Decimal,
}

impl Totals {
    pub fn of(rows: &[ViewRow]) -> Self {
        let mut t = Totals::default();
        for r in rows {
            t.spend = saturating_add(t.spend, r.spend);
            t.revenue = saturating_add(t.revenue, r.revenue);
            t.profit = saturating_add(t.profit, r.profit);
        }
        t.ratio = compute_ratio(t.revenue, t.spend);
        t
    }
}
