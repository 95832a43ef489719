// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Three-valued legacy-layout detection result (§3, §4.8.1).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionState {
    NotLegacy,
    LegacyConfirmed,
    UnknownIoError,
}

/// Result of `detectMigrationState()`. Invariant: `requires_backup` is `true`
/// only if `state == LegacyConfirmed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub state: DetectionState,
    pub requires_backup: bool,
    pub reason: String,
    pub diagnostics: Value,
}

impl DetectionResult {
    pub fn not_legacy(reason: impl Into<String>, diagnostics: Value) -> Self {
        Self {
            state: DetectionState::NotLegacy,
            requires_backup: false,
            reason: reason.into(),
            diagnostics,
        }
    }

    pub fn legacy_confirmed(reason: impl Into<String>, diagnostics: Value) -> Self {
        Self {
            state: DetectionState::LegacyConfirmed,
            requires_backup: true,
            reason: reason.into(),
            diagnostics,
        }
    }

    pub fn unknown_io_error(reason: impl Into<String>, diagnostics: Value) -> Self {
        Self {
            state: DetectionState::UnknownIoError,
            requires_backup: false,
            reason: reason.into(),
            diagnostics,
        }
    }
}

#[cfg(test)]
#[path = "detection_tests.rs"]
mod tests;
