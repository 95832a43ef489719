// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted data model: `env.json` and `version.json` record shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who is authorized to mutate the managed runtime.
///
/// `Managed`: the core alone may create, rebuild, or delete the runtime.
/// `External`: the user owns the runtime; the core only observes and prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    Managed,
    External,
}

impl Ownership {
    pub fn is_managed(self) -> bool {
        matches!(self, Ownership::Managed)
    }
}

/// `env.json`: the authoritative record of which interpreter backs a
/// workspace and who owns it. Written only after a full provision or
/// adoption succeeds; read on every resolver call (§4.4). Never deleted by
/// the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvMetadata {
    pub interpreter_path: String,
    pub ownership: Ownership,
    pub dependency_set_fingerprint: String,
    pub created_at: DateTime<Utc>,
    pub platform: String,
}

/// `version.json`: an informational cache of the last successful
/// verification. Never consulted for correctness, only surfaced in
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub bridge_version: String,
    pub extension_version: String,
    pub runtime_version: String,
    pub dependency_set_fingerprint: String,
    pub last_verified_at: DateTime<Utc>,
}

/// Compute the hex-encoded SHA-256 digest of a canonical dependency manifest.
///
/// The manifest is any stable byte representation of the dependency set
/// (e.g. a sorted `name==version` list joined by newlines); callers own
/// canonicalization. This is the single hashing primitive used both by the
/// provisioner (to stamp `env.json`) and by `checkDependencyFingerprint`
/// (to detect drift).
pub fn dependency_fingerprint(canonical_manifest: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(canonical_manifest);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
