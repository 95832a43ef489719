// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit event shape and the closed taxonomy of event types (§3, §4.8).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed enumeration of audit event types. Drawn from §3/§4.8 (migration
/// lifecycle) plus the resolver/preflight/provisioner decisions §4.4-§4.6
/// say must be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    MigrationCheckInvoked,
    OrphanGuardFileDetected,
    MigrationDetectionResult,
    UnknownIoError,
    BackupModalShown,
    BackupUserConfirmed,
    BackupUserDeclined,
    PreBackupRevalidation,
    BackupStarted,
    BackupQuiesceStart,
    BackupQuiesceComplete,
    BackupQuiesceFailed,
    BackupGuardFileWritten,
    BackupGuardFileDeleted,
    BackupCompleted,
    BackupFailed,
    ResolverDecision,
    PreflightVerified,
    ProvisionStarted,
    ProvisionCompleted,
    ProvisionFailed,
    RefreshStarted,
    RefreshCompleted,
    RefreshFailed,
}

/// One JSONL line in the forensic audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub workspace_path: String,
    pub extension_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
#[path = "audit_event_tests.rs"]
mod tests;
