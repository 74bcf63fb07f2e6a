// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Structured fields encoded in ad names.
//!
//! Names follow `D-CHANNEL_DOMAIN_BUYING_CATEGORY[_COUNTRY[_LANG]]`, e.g.
//! `3-ch001_shop_auction_electronics_us_en`. Production names do not always
//! follow the convention, so every function here is total: a name that does
//! not match yields the documented sentinel instead of an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "UNKNOWN";

static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([0-9])-").unwrap());
static CHANNEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[0-9]-([^_]+)").unwrap());
static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[0-9]-[^_]+_([^_]+)").unwrap());
static BUYING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[0-9]-[^_]+_[^_]+_([^_]+)").unwrap());
// Group 2 is the tail after the category token, if any.
static CATEGORY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*[0-9]-[^_]+_[^_]+_[^_]+_([^_]+)(?:_(.*))?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParsedIdentity {
    pub account: String,
    pub channel_id: String,
    pub domain: String,
    pub buying_method: String,
    pub category: String,
    pub locale: String,
}

impl ParsedIdentity {
    pub fn parse(name: &str) -> Self {
        Self {
            account: account(name),
            channel_id: channel_id(name),
            domain: domain(name),
            buying_method: buying_method(name),
            category: category(name),
            locale: locale(name),
        }
    }

    /// True when the name did not carry every mandatory segment.
    pub fn is_degraded(&self) -> bool {
        self.account.is_empty()
            || self.channel_id.is_empty()
            || self.domain == UNKNOWN
            || self.buying_method == UNKNOWN
            || self.category == UNKNOWN
    }
}

impl Default for ParsedIdentity {
    fn default() -> Self {
        Self::parse("")
    }
}

fn capture(re: &Regex, name: &str) -> Option<String> {
    re.captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Leading digit of the name, iff it is immediately followed by `-`.
pub fn account(name: &str) -> String {
    capture(&ACCOUNT_RE, name).unwrap_or_default()
}

pub fn channel_id(name: &str) -> String {
    capture(&CHANNEL_RE, name).unwrap_or_default()
}

pub fn domain(name: &str) -> String {
    capture(&DOMAIN_RE, name).unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn buying_method(name: &str) -> String {
    capture(&BUYING_RE, name).unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn category(name: &str) -> String {
    capture(&CATEGORY_RE, name).unwrap_or_else(|| UNKNOWN.to_string())
}

/// First two-letter alphabetic token after the category, optionally joined
/// with the following two-letter token as a language (`us_en`).
pub fn locale(name: &str) -> String {
    let tail = CATEGORY_RE
        .captures(name)
        .and_then(|c| c.get(2))
        .map(|m| m.as_str())
        .unwrap_or("");
    let tokens: Vec<&str> = tail.split('_').map(str::trim).collect();
    let two_letters = |t: &str| t.len() == 2 && t.chars().all(|c| c.is_ascii_alphabetic());

    let Some(pos) = tokens.iter().position(|t| two_letters(t)) else {
        return UNKNOWN.to_string();
    };
    let country = tokens[pos].to_ascii_lowercase();
    match tokens.get(pos + 1) {
        Some(lang) if two_letters(lang) => format!("{}_{}", country, lang.to_ascii_lowercase()),
        _ => country,
    }
}
