// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::changes::{Batch, FieldChanges, Proposal, build_batch};
use crate::commands::view::report_for;
use crate::config::Settings;
use crate::models::columns;
use crate::sink::{BatchReport, DryRunSink, GraphApiSink, MutationSink, submit_batch};
use crate::sources::read_csv_table;
use crate::utils::{coerce_number, http_client, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    batch: &'a Batch,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted: Option<&'a BatchReport>,
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("proposals").unwrap().trim();
    let proposals = load_proposals(Path::new(path))?;
    let report = report_for(conn, sub, &proposals)?;
    let batch = build_batch(&report.view.rows);

    let submitted = if sub.get_flag("apply") {
        let mut sink: Box<dyn MutationSink> = if sub.get_flag("dry_run") {
            Box::new(DryRunSink::default())
        } else {
            let settings = Settings::load(conn)?;
            Box::new(
                GraphApiSink::new(
                    http_client()?,
                    &settings.graph_api_base,
                    settings.access_token.as_deref(),
                )
                .context("Cannot submit updates")?,
            )
        };
        Some(submit_batch(sink.as_mut(), &batch.requests))
    } else {
        None
    };

    let out = PlanOutput {
        batch: &batch,
        submitted: submitted.as_ref(),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        return Ok(());
    }

    println!("{} change(s) ready to apply", batch.requests.len());
    if !batch.requests.is_empty() {
        let rows = batch
            .requests
            .iter()
            .map(|r| {
                let (budget, status) = describe(&r.changes);
                vec![r.label.clone(), r.target_id.clone(), budget, status]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Ad Name", "Ad Set ID", "daily_budget", "status"], rows)
        );
    }
    for (label, changes) in &batch.no_target {
        let (budget, status) = describe(changes);
        println!(
            "No valid updates for {} (no Ad Set ID; budget {}, status {})",
            label,
            if budget.is_empty() { "-" } else { budget.as_str() },
            if status.is_empty() { "-" } else { status.as_str() }
        );
    }

    if let Some(rep) = submitted {
        for f in &rep.failures {
            eprintln!("Failed to update {}: {}", f.label, f.error);
        }
        if rep.successes > 0 {
            println!("Applied {} update(s)", rep.successes);
        }
        if !rep.failures.is_empty() {
            println!("{} update(s) failed", rep.failures.len());
        }
    }
    Ok(())
}

fn describe(changes: &FieldChanges) -> (String, String) {
    (
        changes
            .daily_budget
            .map(|b| b.to_string())
            .unwrap_or_default(),
        changes.status.clone().unwrap_or_default(),
    )
}

/// Reads operator proposals keyed by ad name. A blank budget means "leave
/// the budget alone"; a blank status means "leave the status alone".
pub fn load_proposals(path: &Path) -> Result<HashMap<String, Proposal>> {
    let table = read_csv_table(path)
        .with_context(|| format!("Open proposals CSV {}", path.display()))?;
    let mut out = HashMap::new();
    for row in &table.rows {
        let name = match row.get(columns::AD_NAME) {
            Some(n) if !n.is_empty() => n.clone(),
            _ => continue,
        };
        let proposal = Proposal {
            budget: coerce_number(row.get(columns::NEW_BUDGET).map(String::as_str)),
            status: row
                .get(columns::NEW_STATUS)
                .filter(|s| !s.is_empty())
                .cloned(),
        };
        out.insert(name, proposal);
    }
    Ok(out)
}
