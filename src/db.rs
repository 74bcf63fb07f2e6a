// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result as CoreResult;
use crate::models::RawTable;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Adpilot", "adpilot"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("adpilot.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sheets(
        name TEXT PRIMARY KEY,
        imported_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS sheet_columns(
        sheet TEXT NOT NULL,
        position INTEGER NOT NULL,
        name TEXT NOT NULL,
        PRIMARY KEY(sheet, position),
        FOREIGN KEY(sheet) REFERENCES sheets(name) ON DELETE CASCADE
    );

    -- absent cells have no row here
    CREATE TABLE IF NOT EXISTS sheet_cells(
        sheet TEXT NOT NULL,
        row_idx INTEGER NOT NULL,
        column_name TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY(sheet, row_idx, column_name),
        FOREIGN KEY(sheet) REFERENCES sheets(name) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn replace_sheet(conn: &mut Connection, name: &str, table: &RawTable) -> CoreResult<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM sheet_cells WHERE sheet=?1", params![name])?;
    tx.execute("DELETE FROM sheet_columns WHERE sheet=?1", params![name])?;
    tx.execute("DELETE FROM sheets WHERE name=?1", params![name])?;
    tx.execute("INSERT INTO sheets(name) VALUES (?1)", params![name])?;
    {
        let mut col_stmt =
            tx.prepare("INSERT INTO sheet_columns(sheet, position, name) VALUES (?1,?2,?3)")?;
        for (pos, col) in table.columns.iter().enumerate() {
            col_stmt.execute(params![name, pos as i64, col])?;
        }
        let mut cell_stmt = tx.prepare(
            "INSERT OR REPLACE INTO sheet_cells(sheet, row_idx, column_name, value) VALUES (?1,?2,?3,?4)",
        )?;
        for (idx, row) in table.rows.iter().enumerate() {
            for (col, value) in row {
                cell_stmt.execute(params![name, idx as i64, col, value])?;
            }
        }
    }
    tx.commit()?;
    Ok(table.rows.len())
}

/// `None` when the sheet was never imported.
pub fn read_sheet(conn: &Connection, name: &str) -> CoreResult<Option<RawTable>> {
    let exists: Option<String> = conn
        .query_row("SELECT name FROM sheets WHERE name=?1", params![name], |r| {
            r.get(0)
        })
        .optional()?;
    if exists.is_none() {
        return Ok(None);
    }

    let mut col_stmt =
        conn.prepare("SELECT name FROM sheet_columns WHERE sheet=?1 ORDER BY position")?;
    let columns = col_stmt
        .query_map(params![name], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut cell_stmt = conn.prepare(
        "SELECT row_idx, column_name, value FROM sheet_cells WHERE sheet=?1 ORDER BY row_idx",
    )?;
    let mut cur = cell_stmt.query(params![name])?;
    let mut rows: Vec<HashMap<String, String>> = Vec::new();
    let mut last_idx: Option<i64> = None;
    while let Some(r) = cur.next()? {
        let idx: i64 = r.get(0)?;
        if last_idx != Some(idx) {
            rows.push(HashMap::new());
            last_idx = Some(idx);
        }
        if let Some(row) = rows.last_mut() {
            row.insert(r.get(1)?, r.get(2)?);
        }
    }
    Ok(Some(RawTable { columns, rows }))
}

pub fn list_sheets(conn: &Connection) -> Result<Vec<(String, i64, String)>> {
    let mut stmt = conn.prepare(
        "SELECT s.name,
                (SELECT COUNT(DISTINCT row_idx) FROM sheet_cells c WHERE c.sheet=s.name),
                s.imported_at
         FROM sheets s ORDER BY s.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
