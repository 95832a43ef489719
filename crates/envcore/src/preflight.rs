// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Preflight verification result shape, the reason-code taxonomy, and the
//! ownership-driven remediation mapping (§3, §4.5).

use crate::model::Ownership;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreflightStatus {
    Healthy,
    ModuleMissing,
    InterpreterNotRunnable,
    InProgress,
}

/// Low-cardinality classification of *why* a preflight probe failed.
/// Classification never branches on parsed English beyond this mapping; see
/// `envcore_engine::preflight::classify_reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    PythonNotFound,
    PythonExecFailed,
    PythonTimeout,
    ModuleImportFailed,
    ModuleDepNotFound,
    DllLoadFailed,
    DbLockedOrBusy,
    PermissionDenied,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemediationAction {
    RefreshDependencies,
    InstallGuidance,
    InitializeWorkspace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remediation {
    pub action: RemediationAction,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
}

impl Remediation {
    /// Ownership-driven remediation mapping (§4.5): `managed` failures offer
    /// a one-click refresh; `external` failures get textual guidance only,
    /// never a mutating action; unknown ownership means the workspace was
    /// never initialized.
    pub fn for_ownership(ownership: Option<Ownership>) -> Self {
        match ownership {
            Some(Ownership::Managed) => Remediation {
                action: RemediationAction::RefreshDependencies,
                message: "The managed runtime is missing the required module. Refresh dependencies to repair it.".into(),
                command_id: Some("envcore.refreshDependencies".into()),
            },
            Some(Ownership::External) => Remediation {
                action: RemediationAction::InstallGuidance,
                message: "This interpreter is externally managed. Install the required module in it manually.".into(),
                command_id: None,
            },
            None => Remediation {
                action: RemediationAction::InitializeWorkspace,
                message: "No managed runtime found for this workspace yet. Initialize it to continue.".into(),
                command_id: Some("envcore.initializeWorkspace".into()),
            },
        }
    }
}

/// Result of a single `verify()` call (§3, §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightResult {
    pub status: PreflightStatus,
    pub module_importable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_version: Option<String>,
    pub interpreter_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Ownership>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<ReasonCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
    pub duration_ms: u64,
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
#[path = "preflight_tests.rs"]
mod tests;
