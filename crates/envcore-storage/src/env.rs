// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the storage crate.

/// Override for the audit log rotation threshold in bytes. Falls back to
/// `envcore::AUDIT_ROTATION_THRESHOLD_BYTES` (§9: policy value, not
/// user-configurable, but an implementation may expose it).
pub fn audit_rotation_threshold_bytes() -> u64 {
    std::env::var("ENVCORE_AUDIT_ROTATION_THRESHOLD_BYTES")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(envcore::AUDIT_ROTATION_THRESHOLD_BYTES)
}

/// Override for the audit log retention cap.
pub fn audit_retention_cap() -> usize {
    std::env::var("ENVCORE_AUDIT_RETENTION_CAP")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(envcore::AUDIT_RETENTION_CAP)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
