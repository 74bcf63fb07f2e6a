// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("{name} sheet is empty or not accessible")]
    EmptySource { name: String },

    #[error("No data available for the selected {scope}")]
    EmptySelection { scope: String },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: String, end: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid ratio '{raw}': not numeric after removing '%'")]
pub struct FormatError {
    pub raw: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("platform rejected update ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("missing access token")]
    MissingToken,
}
