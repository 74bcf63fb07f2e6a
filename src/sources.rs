// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where raw sheets come from. Every source degrades to an empty table on
//! failure; deciding whether emptiness is fatal is the caller's job.

use crate::error::Result;
use crate::models::RawTable;
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

pub trait TableSource {
    fn read(&self, name: &str) -> RawTable;
}

pub trait ControlSource {
    fn read(&self) -> RawTable;
}

/// Reads a CSV export with a header row. Cells are trimmed; rows shorter
/// than the header leave the trailing cells absent.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = RawTable::new(columns);
    for result in rdr.records() {
        let rec = result?;
        let row: HashMap<String, String> = table
            .columns
            .iter()
            .cloned()
            .zip(rec.iter().map(str::to_string))
            .collect();
        table.rows.push(row);
    }
    Ok(table)
}

pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }
}

impl TableSource for CsvDirSource {
    fn read(&self, name: &str) -> RawTable {
        let path = self.path_for(name);
        read_csv_table(&path).unwrap_or_else(|e| {
            warn!(sheet = name, path = %path.display(), "could not read sheet: {}", e);
            RawTable::default()
        })
    }
}

pub struct SqliteWorkbook<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteWorkbook<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl TableSource for SqliteWorkbook<'_> {
    fn read(&self, name: &str) -> RawTable {
        match crate::db::read_sheet(self.conn, name) {
            Ok(Some(t)) => t,
            Ok(None) => {
                warn!(sheet = name, "sheet has not been imported");
                RawTable::default()
            }
            Err(e) => {
                warn!(sheet = name, "could not read sheet: {}", e);
                RawTable::default()
            }
        }
    }
}

pub struct SheetControl<S> {
    source: S,
    sheet: String,
}

impl<S: TableSource> SheetControl<S> {
    pub fn new(source: S, sheet: &str) -> Self {
        Self {
            source,
            sheet: sheet.to_string(),
        }
    }
}

impl<S: TableSource> ControlSource for SheetControl<S> {
    fn read(&self) -> RawTable {
        self.source.read(&self.sheet)
    }
}
