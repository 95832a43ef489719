// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

/// Override for the preflight result cache TTL (default: 30s, §4.5: a
/// policy value, not user-configurable, but exposed for operators and
/// tests).
pub fn preflight_cache_ttl() -> Duration {
    std::env::var("ENVCORE_PREFLIGHT_CACHE_TTL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(envcore::PREFLIGHT_CACHE_TTL_SECS))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
