// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for a single preflight probe subprocess (default: 10000ms, §4.5).
pub fn preflight_timeout_ms() -> Duration {
    parse_duration_ms("ENVCORE_PREFLIGHT_TIMEOUT_MS").unwrap_or(Duration::from_secs(10))
}

/// Timeout for dependency-install subprocess invocations (default: 120000ms).
pub fn provision_timeout_ms() -> Duration {
    parse_duration_ms("ENVCORE_PROVISION_TIMEOUT_MS").unwrap_or(Duration::from_secs(120))
}

/// Background scheduler pause budget before migration gives up waiting for
/// quiescence (default: 5000ms, §4.8.2).
pub fn background_pause_timeout_ms() -> Duration {
    parse_duration_ms("ENVCORE_BACKGROUND_PAUSE_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Daemon stop budget during migration (default: 15000ms, §4.8.2).
pub fn daemon_stop_timeout_ms() -> Duration {
    parse_duration_ms("ENVCORE_DAEMON_STOP_TIMEOUT_MS").unwrap_or(Duration::from_secs(15))
}

/// Post-rename filesystem settle delay on Windows, to let file handles
/// release before revalidation (default: 300ms, §4.8.2).
pub fn windows_settle_ms() -> Duration {
    parse_duration_ms("ENVCORE_WINDOWS_SETTLE_MS").unwrap_or(Duration::from_millis(300))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
