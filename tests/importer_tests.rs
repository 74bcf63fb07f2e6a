// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use adpilot::db::{init_schema, list_sheets, read_sheet, replace_sheet};
use adpilot::models::RawTable;
use adpilot::sources::{CsvDirSource, SqliteWorkbook, TableSource, read_csv_table};
use adpilot::{cli, commands::importer};
use rusqlite::Connection;
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn run_import(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["adpilot", "import"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn importer_trims_cli_path_argument() {
    let mut conn = base_conn();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Date,Ad Name,Spend (USD),Revenue (USD)\n2024-01-10,  1-ch1_shop_cpc_toys_us  ,10,12"
    )
    .unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    run_import(&mut conn, &["sheet", "--name", "ROAS", "--path", &padded]).unwrap();

    let table = read_sheet(&conn, "ROAS").unwrap().unwrap();
    assert_eq!(
        table.columns,
        vec!["Date", "Ad Name", "Spend (USD)", "Revenue (USD)"]
    );
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0]["Ad Name"], "1-ch1_shop_cpc_toys_us");
    assert_eq!(table.rows[0]["Revenue (USD)"], "12");
}

#[test]
fn reimport_replaces_the_sheet() {
    let mut conn = base_conn();

    let mut first = NamedTempFile::new().unwrap();
    writeln!(first, "Ad Name,Ad Set ID\na,1\nb,2\nc,3").unwrap();
    first.flush().unwrap();
    let mut second = NamedTempFile::new().unwrap();
    writeln!(second, "Ad Name,Current Status\nz,ACTIVE").unwrap();
    second.flush().unwrap();

    let p1 = first.path().to_str().unwrap().to_string();
    let p2 = second.path().to_str().unwrap().to_string();
    run_import(&mut conn, &["sheet", "--name", "Manual Control", "--path", &p1]).unwrap();
    run_import(&mut conn, &["sheet", "--name", "Manual Control", "--path", &p2]).unwrap();

    let table = read_sheet(&conn, "Manual Control").unwrap().unwrap();
    assert_eq!(table.columns, vec!["Ad Name", "Current Status"]);
    assert_eq!(table.rows.len(), 1);
    assert!(!table.rows[0].contains_key("Ad Set ID"));

    let sheets = list_sheets(&conn).unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].0, "Manual Control");
    assert_eq!(sheets[0].1, 1);
}

#[test]
fn importer_rejects_blank_sheet_name() {
    let mut conn = base_conn();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Ad Name\nx").unwrap();
    file.flush().unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let err = run_import(&mut conn, &["sheet", "--name", "   ", "--path", &path]).unwrap_err();
    assert!(err.to_string().contains("must not be empty"));
    assert!(list_sheets(&conn).unwrap().is_empty());
}

#[test]
fn short_rows_leave_trailing_cells_absent() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Ad Name,Ad Set ID,Current Status\n x ,  7\ny,8,PAUSED").unwrap();
    file.flush().unwrap();

    let table = read_csv_table(file.path()).unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0]["Ad Name"], "x");
    assert_eq!(table.rows[0]["Ad Set ID"], "7");
    assert!(!table.rows[0].contains_key("Current Status"));
    assert_eq!(table.rows[1]["Current Status"], "PAUSED");
}

#[test]
fn workbook_round_trips_blank_cells() {
    let mut conn = base_conn();
    let table = RawTable::from_rows(
        ["Ad Name", "ROAS"],
        [vec!["a", ""], vec!["b", "120%"]],
    );
    assert_eq!(replace_sheet(&mut conn, "ROAS", &table).unwrap(), 2);

    let back = SqliteWorkbook::new(&conn).read("ROAS");
    assert_eq!(back, table);
}

#[test]
fn missing_sheets_read_as_empty() {
    let conn = base_conn();
    assert!(read_sheet(&conn, "ROAS").unwrap().is_none());
    assert!(SqliteWorkbook::new(&conn).read("ROAS").is_empty());

    let dir = tempdir().unwrap();
    let src = CsvDirSource::new(dir.path());
    assert!(src.read("Manual Control").is_empty());

    std::fs::write(
        src.path_for("Manual Control"),
        "Ad Name,Ad Set ID\nx,'42\n",
    )
    .unwrap();
    let table = src.read("Manual Control");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0]["Ad Set ID"], "'42");
}
