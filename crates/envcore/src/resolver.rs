// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interpreter resolution result shape (§4.4). The 4-tier precedence walk
//! itself lives in `envcore_engine::resolver` since it depends on the
//! metadata store and config port; this type is the shared contract.

use crate::model::Ownership;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolverReason {
    Metadata,
    ManagedVenvHeuristic,
    ExplicitConfig,
    SystemFallback,
}

/// The outcome of one resolver call: which interpreter to use, why, and
/// whether `env.json` existed at all (surfaced for diagnostics even when the
/// winning tier was not metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInterpreter {
    pub interpreter_path: String,
    pub reason: ResolverReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Ownership>,
    pub metadata_exists: bool,
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
