// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::view::report_for;
use crate::filter::effective_status;
use crate::models::ViewRow;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("view", sub)) => export_view(conn, sub),
        _ => Ok(()),
    }
}

fn opt(v: Option<rust_decimal::Decimal>) -> String {
    v.map(|d| d.to_string()).unwrap_or_default()
}

fn export_view(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let report = report_for(conn, sub, &HashMap::new())?;
    let rows: &[ViewRow] = &report.view.rows;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "ad_name",
                "channel_id",
                "account",
                "domain",
                "buying_method",
                "category",
                "locale",
                "spend",
                "revenue",
                "profit",
                "roas",
                "dbf",
                "2dbf",
                "ad_set_id",
                "current_budget",
                "status",
            ])?;
            for r in rows {
                wtr.write_record([
                    r.ad_name.clone(),
                    r.channel_id.clone(),
                    r.identity.account.clone(),
                    r.identity.domain.clone(),
                    r.identity.buying_method.clone(),
                    r.identity.category.clone(),
                    r.identity.locale.clone(),
                    r.spend.to_string(),
                    r.revenue.to_string(),
                    r.profit.to_string(),
                    r.ratio.to_string(),
                    opt(r.baseline_1),
                    opt(r.baseline_2),
                    r.ad_set_id.clone(),
                    r.current_budget.to_string(),
                    effective_status(r),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = rows
                .iter()
                .map(|r| {
                    json!({
                        "ad_name": r.ad_name, "channel_id": r.channel_id,
                        "identity": r.identity, "spend": r.spend, "revenue": r.revenue,
                        "profit": r.profit, "roas": r.ratio, "dbf": r.baseline_1, "2dbf": r.baseline_2,
                        "ad_set_id": r.ad_set_id, "current_budget": r.current_budget,
                        "status": effective_status(r)
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported {} row(s) to {}", rows.len(), out);
    Ok(())
}
