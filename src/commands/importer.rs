// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{list_sheets, replace_sheet};
use crate::sources::read_csv_table;
use crate::utils::pretty_table;
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("sheet", sub)) => import_sheet(conn, sub),
        Some(("list", _)) => list(conn),
        _ => Ok(()),
    }
}

fn import_sheet(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let path = sub.get_one::<String>("path").unwrap().trim();
    if name.is_empty() {
        return Err(anyhow!("Sheet name must not be empty"));
    }

    let table = read_csv_table(Path::new(path)).with_context(|| format!("Open CSV {}", path))?;
    if table.columns.iter().all(|c| c.is_empty()) {
        return Err(anyhow!("CSV {} has no header row", path));
    }
    let count = replace_sheet(conn, name, &table)
        .with_context(|| format!("Store sheet '{}'", name))?;
    info!(sheet = name, rows = count, "sheet imported");
    println!("Imported {} row(s) into sheet '{}' from {}", count, name, path);
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let data = list_sheets(conn)?
        .into_iter()
        .map(|(name, rows, at)| vec![name, rows.to_string(), at])
        .collect();
    println!("{}", pretty_table(&["Sheet", "Rows", "Imported At"], data));
    Ok(())
}
