// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::changes::{FieldChanges, MutationRequest};
use crate::error::MutationError;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub trait MutationSink {
    fn apply(&mut self, target_id: &str, changes: &FieldChanges) -> Result<(), MutationError>;
}

pub struct GraphApiSink {
    client: reqwest::blocking::Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    #[serde(default)]
    success: Option<bool>,
}

impl GraphApiSink {
    pub fn new(
        client: reqwest::blocking::Client,
        base_url: &str,
        access_token: Option<&str>,
    ) -> Result<Self, MutationError> {
        let token = access_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(MutationError::MissingToken)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: token.to_string(),
        })
    }

    pub fn endpoint(&self, target_id: &str) -> String {
        format!("{}/{}", self.base_url, target_id)
    }
}

impl MutationSink for GraphApiSink {
    fn apply(&mut self, target_id: &str, changes: &FieldChanges) -> Result<(), MutationError> {
        let mut form = changes.params();
        form.push(("access_token", self.access_token.clone()));

        let resp = self
            .client
            .post(self.endpoint(target_id))
            .form(&form)
            .send()
            .map_err(|e| MutationError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| MutationError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(MutationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        match serde_json::from_str::<UpdateResponse>(&body) {
            Ok(UpdateResponse {
                success: Some(false),
            }) => Err(MutationError::Rejected {
                status: status.as_u16(),
                body,
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct DryRunSink {
    pub applied: Vec<(String, FieldChanges)>,
}

impl MutationSink for DryRunSink {
    fn apply(&mut self, target_id: &str, changes: &FieldChanges) -> Result<(), MutationError> {
        info!(target_id, ?changes, "dry run: update not sent");
        self.applied.push((target_id.to_string(), changes.clone()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub label: String,
    pub target_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub successes: usize,
    pub failures: Vec<Failure>,
}

/// Sends every request once, in order. A failed request is recorded and the
/// rest of the batch still goes out.
pub fn submit_batch(sink: &mut dyn MutationSink, requests: &[MutationRequest]) -> BatchReport {
    let mut report = BatchReport::default();
    for req in requests {
        match sink.apply(&req.target_id, &req.changes) {
            Ok(()) => {
                info!(ad_name = %req.label, target_id = %req.target_id, "updated");
                report.successes += 1;
            }
            Err(e) => {
                error!(ad_name = %req.label, target_id = %req.target_id, "update failed: {}", e);
                report.failures.push(Failure {
                    label: req.label.clone(),
                    target_id: req.target_id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    info!(
        successes = report.successes,
        failures = report.failures.len(),
        "batch submitted"
    );
    report
}
