// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The guard file: a host-storage crash-consistency record written
//! immediately before a destructive rename and deleted after it succeeds.
//! Its presence at activation is advisory, never authoritative (§5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardStatus {
    InProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardRecord {
    pub operation_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub workspace_path: PathBuf,
    pub extension_version: String,
    pub target_backup_path: PathBuf,
    pub status: GuardStatus,
}

impl GuardRecord {
    pub fn new(
        operation_id: Uuid,
        started_at: DateTime<Utc>,
        workspace_path: PathBuf,
        extension_version: String,
        target_backup_path: PathBuf,
    ) -> Self {
        Self {
            operation_id,
            started_at,
            workspace_path,
            extension_version,
            target_backup_path,
            status: GuardStatus::InProgress,
        }
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
