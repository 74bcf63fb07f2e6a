// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::get_setting;
use anyhow::Result;
use rusqlite::Connection;

pub const PERFORMANCE_SHEET: &str = "performance_sheet";
pub const CONTROL_SHEET: &str = "control_sheet";
pub const GRAPH_API_BASE: &str = "graph_api_base";
pub const ACCESS_TOKEN: &str = "access_token";

pub const KEYS: [&str; 4] = [PERFORMANCE_SHEET, CONTROL_SHEET, GRAPH_API_BASE, ACCESS_TOKEN];

pub const TOKEN_ENV: &str = "ADPILOT_ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub performance_sheet: String,
    pub control_sheet: String,
    pub graph_api_base: String,
    pub access_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            performance_sheet: "ROAS".to_string(),
            control_sheet: "Manual Control".to_string(),
            graph_api_base: "https://graph.facebook.com/v19.0".to_string(),
            access_token: None,
        }
    }
}

impl Settings {
    /// Defaults, then values stored in the settings table, then the
    /// environment (token only).
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = get_setting(conn, PERFORMANCE_SHEET)? {
            s.performance_sheet = v;
        }
        if let Some(v) = get_setting(conn, CONTROL_SHEET)? {
            s.control_sheet = v;
        }
        if let Some(v) = get_setting(conn, GRAPH_API_BASE)? {
            s.graph_api_base = v;
        }
        s.access_token = get_setting(conn, ACCESS_TOKEN)?;
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                s.access_token = Some(token);
            }
        }
        Ok(s)
    }
}

pub fn is_known_key(key: &str) -> bool {
    KEYS.contains(&key)
}

/// Keeps the last four characters of secrets visible.
pub fn mask(key: &str, value: &str) -> String {
    if key != ACCESS_TOKEN {
        return value.to_string();
    }
    let n = value.chars().count();
    if n <= 4 {
        return "*".repeat(n);
    }
    let tail: String = value.chars().skip(n - 4).collect();
    format!("{}{}", "*".repeat(n - 4), tail)
}
