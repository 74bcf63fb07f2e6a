// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{KEYS, Settings, is_known_key, mask};
use crate::db::{get_setting, set_setting};
use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap().trim();
            check_key(key)?;
            set_setting(conn, key, value)?;
            println!("{} = {}", key, mask(key, value));
        }
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            check_key(key)?;
            match get_setting(conn, key)? {
                Some(v) => println!("{}", mask(key, &v)),
                None => println!("(unset)"),
            }
        }
        Some(("list", _)) => {
            let s = Settings::load(conn)?;
            let rows = KEYS
                .iter()
                .map(|k| {
                    let v = match *k {
                        crate::config::PERFORMANCE_SHEET => s.performance_sheet.clone(),
                        crate::config::CONTROL_SHEET => s.control_sheet.clone(),
                        crate::config::GRAPH_API_BASE => s.graph_api_base.clone(),
                        _ => s.access_token.clone().unwrap_or_default(),
                    };
                    vec![k.to_string(), mask(k, &v)]
                })
                .collect();
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}

fn check_key(key: &str) -> Result<()> {
    if !is_known_key(key) {
        return Err(anyhow!(
            "Unknown setting '{}' (known: {})",
            key,
            KEYS.join(", ")
        ));
    }
    Ok(())
}
