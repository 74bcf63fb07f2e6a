// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::changes::Proposal;
use crate::config::Settings;
use crate::filter::{Filters, Selection, StatusFilter, effective_status};
use crate::models::{View, ViewRow};
use crate::pipeline::{Report, Request, Scope, build_report};
use crate::range::DatePreset;
use crate::ratio::{format_ratio, ratio_cell};
use crate::sources::{CsvDirSource, SheetControl, SqliteWorkbook};
use crate::summary::Totals;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, styled_table};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};
use comfy_table::{Cell, Color};
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = report_for(conn, sub, &HashMap::new())?;

    if sub.get_flag("options") {
        let o = &report.options;
        let rows = vec![
            vec!["Account".to_string(), o.accounts.join(", ")],
            vec!["Category".to_string(), o.categories.join(", ")],
            vec!["Domain".to_string(), o.domains.join(", ")],
            vec!["Locale".to_string(), o.locales.join(", ")],
        ];
        if !maybe_print_json(sub.get_flag("json"), false, o)? {
            println!("{}", pretty_table(&["Filter", "Values"], rows));
        }
        return Ok(());
    }

    if maybe_print_json(sub.get_flag("json"), false, &report)?
        || maybe_print_json(false, sub.get_flag("jsonl"), &report.view.rows)?
    {
        return Ok(());
    }

    println!("{}", summary_line(&report.summary));
    println!("{}", render(&report.view, &report.totals));
    if !report.normalize.degraded_names.is_empty() {
        println!(
            "{} row(s) have ad names outside the naming convention (see `adpilot doctor`)",
            report.normalize.degraded_names.len()
        );
    }
    Ok(())
}

pub(crate) fn scope_from(sub: &clap::ArgMatches, today: NaiveDate) -> Result<Scope> {
    if let Some(d) = sub.get_one::<String>("date") {
        return Ok(Scope::Day(parse_date(d)?));
    }
    if let Some(p) = sub.get_one::<String>("preset") {
        let preset: DatePreset = p.parse().map_err(|e: String| anyhow!(e))?;
        let (start, end) = preset.resolve(today);
        return Ok(Scope::Range { start, end });
    }
    match (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        (Some(f), Some(t)) => Ok(Scope::Range {
            start: parse_date(f)?,
            end: parse_date(t)?,
        }),
        _ => Err(anyhow!("Specify --date, --preset, or --from/--to")),
    }
}

pub(crate) fn filters_from(sub: &clap::ArgMatches) -> Result<Filters> {
    let pick = |name: &str| Selection::from_option(sub.get_one::<String>(name).map(|s| s.trim()));
    let status = match sub.get_one::<String>("status") {
        Some(s) => s.parse::<StatusFilter>().map_err(|e| anyhow!(e))?,
        None => StatusFilter::All,
    };
    Ok(Filters {
        account: pick("account"),
        status,
        category: pick("category"),
        domain: pick("domain"),
        locale: pick("locale"),
    })
}

/// Builds the report from the local workbook, or from CSV files when
/// `--source-dir` is given.
pub(crate) fn report_for(
    conn: &Connection,
    sub: &clap::ArgMatches,
    proposals: &HashMap<String, Proposal>,
) -> Result<Report> {
    let settings = Settings::load(conn)?;
    let scope = scope_from(sub, Local::now().date_naive())?;
    let filters = filters_from(sub)?;
    let req = Request {
        performance_sheet: &settings.performance_sheet,
        scope,
        filters: &filters,
        proposals,
    };

    let report = match sub.get_one::<String>("source_dir") {
        Some(dir) => {
            let dir = dir.trim();
            let controls = SheetControl::new(CsvDirSource::new(dir), &settings.control_sheet);
            build_report(&CsvDirSource::new(dir), &controls, &req)?
        }
        None => {
            let controls = SheetControl::new(SqliteWorkbook::new(conn), &settings.control_sheet);
            build_report(&SqliteWorkbook::new(conn), &controls, &req)?
        }
    };
    Ok(report)
}

fn summary_line(t: &Totals) -> String {
    format!(
        "Total Spend {} | Total Revenue {} | Total Profit {} | Total ROAS {}",
        fmt_money(&t.spend),
        fmt_money(&t.revenue),
        fmt_money(&t.profit),
        format_ratio(Some(t.ratio))
            .map(|l| l.text)
            .unwrap_or_default()
    )
}

fn status_cell(status: &str) -> Cell {
    let bg = match status {
        "ACTIVE" => Color::Rgb { r: 0xD4, g: 0xED, b: 0xDA },
        "PAUSED" => Color::Rgb { r: 0x5C, g: 0x5B, b: 0x5B },
        _ => Color::Rgb { r: 0x66, g: 0x66, b: 0x66 },
    };
    Cell::new(status).bg(bg).fg(Color::Black)
}

fn row_cells(r: &ViewRow, with_baselines: bool) -> Vec<Cell> {
    let mut cells = vec![
        Cell::new(&r.ad_name),
        Cell::new(fmt_money(&r.spend)),
        Cell::new(fmt_money(&r.revenue)),
        Cell::new(fmt_money(&r.profit)),
        ratio_cell(Some(r.ratio)),
    ];
    if with_baselines {
        cells.push(ratio_cell(r.baseline_1));
        cells.push(ratio_cell(r.baseline_2));
    }
    cells.push(Cell::new(format!("{:.1}", r.current_budget)));
    cells.push(Cell::new(if r.proposed_budget.is_zero() {
        String::new()
    } else {
        format!("{:.1}", r.proposed_budget)
    }));
    cells.push(Cell::new(r.proposed_status.as_deref().unwrap_or("")));
    cells.push(status_cell(&effective_status(r)));
    cells
}

pub(crate) fn render(view: &View, totals: &Totals) -> comfy_table::Table {
    let with_baselines = view.mode.has_baselines();
    let mut headers = vec!["Ad Name", "Spend", "Revenue", "Profit", "ROAS"];
    if with_baselines {
        headers.extend(["DBF", "2DBF"]);
    }
    headers.extend(["Current Budget", "New Budget", "New Status", "AdSet Status"]);

    let mut rows: Vec<Vec<Cell>> = view
        .rows
        .iter()
        .map(|r| row_cells(r, with_baselines))
        .collect();

    let mut total_row = vec![
        Cell::new("Total (filtered)"),
        Cell::new(fmt_money(&totals.spend)),
        Cell::new(fmt_money(&totals.revenue)),
        Cell::new(fmt_money(&totals.profit)),
        ratio_cell(Some(totals.ratio)),
    ];
    while total_row.len() < headers.len() {
        total_row.push(Cell::new(""));
    }
    rows.push(total_row);

    styled_table(&headers, rows)
}
