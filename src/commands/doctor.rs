// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::control::normalize_controls;
use crate::models::RawTable;
use crate::normalize::normalize;
use crate::sources::{CsvDirSource, SqliteWorkbook, TableSource};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::BTreeSet;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let (perf, control) = match m.get_one::<String>("source_dir") {
        Some(dir) => {
            let src = CsvDirSource::new(dir.trim());
            (
                src.read(&settings.performance_sheet),
                src.read(&settings.control_sheet),
            )
        }
        None => {
            let src = SqliteWorkbook::new(conn);
            (
                src.read(&settings.performance_sheet),
                src.read(&settings.control_sheet),
            )
        }
    };

    let rows = diagnose(&settings, &perf, &control);
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn diagnose(settings: &Settings, perf: &RawTable, control: &RawTable) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Missing sheets
    if perf.is_empty() {
        rows.push(vec!["empty_sheet".into(), settings.performance_sheet.clone()]);
    }
    if control.is_empty() {
        rows.push(vec!["empty_sheet".into(), settings.control_sheet.clone()]);
    }

    // 2) Naming convention and dates
    let (records, report) = normalize(perf);
    let degraded: BTreeSet<&str> = report.degraded_names.iter().map(String::as_str).collect();
    for name in degraded {
        rows.push(vec!["name_outside_convention".into(), name.to_string()]);
    }
    if report.invalid_dates > 0 {
        rows.push(vec![
            "invalid_date".into(),
            format!("{} row(s)", report.invalid_dates),
        ]);
    }

    // 3) Control coverage
    let controls = normalize_controls(control);
    let mut controlled = BTreeSet::new();
    for c in &controls {
        controlled.insert(c.ad_name.as_str());
        if c.ad_set_id.is_empty() {
            rows.push(vec!["control_without_ad_set_id".into(), c.ad_name.clone()]);
        }
    }
    let names: BTreeSet<&str> = records.iter().map(|r| r.ad_name.as_str()).collect();
    for name in names {
        if !controlled.contains(name) {
            rows.push(vec!["no_control_row".into(), name.to_string()]);
        }
    }
    rows
}
