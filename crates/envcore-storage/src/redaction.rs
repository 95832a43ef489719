// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Allowlist-based redaction filter for audit log `data` payloads (§4.3).
//!
//! Three rules apply in order, every append: (1) excluded field names are
//! dropped entirely, never placeholder-substituted; (2) any field not on
//! the diagnostic allowlist is replaced with `[REDACTED]`; (3) any
//! allowlisted string value matching a secret pattern is also replaced.
//! Nested objects recurse; arrays of primitives pass through unless their
//! containing key is excluded.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

/// Field names that are dropped entirely. These are names known to carry
/// free-form user or model content that must never reach the log, even
/// placeholder-substituted.
const EXCLUDED_FIELDS: &[&str] = &[
    "memoryText",
    "promptText",
    "completionText",
    "memoryContent",
    "rawQuery",
    "rawResponse",
];

/// Field names permitted to appear, carrying diagnostic (not content)
/// information.
const ALLOWED_FIELDS: &[&str] = &[
    "markerContent",
    "interpreterPath",
    "ownership",
    "reason",
    "reasonCode",
    "status",
    "moduleImportable",
    "moduleVersion",
    "durationMs",
    "cached",
    "source",
    "sessionId",
    "extensionHostPid",
    "dependencySetFingerprint",
    "backupPath",
    "operationId",
    "errorCode",
    "revalidationResult",
    "markerNowPresent",
    "workspacePath",
    "schemaVersion",
    "stderrExcerpt",
    "attempt",
];

fn secret_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            [
                r"^sk-[A-Za-z0-9]{10,}$",
                r"^ghp_[A-Za-z0-9]{10,}$",
                r"^gho_[A-Za-z0-9]{10,}$",
                r"^xox[baprs]-[A-Za-z0-9-]{10,}$",
                r"^ey[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{10,}\.[A-Za-z0-9_-]{5,}$",
                r"(?i)^bearer\s+\S+$",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("static secret pattern is valid"))
            .collect()
        })
        .as_slice()
}

fn looks_like_secret(value: &str) -> bool {
    secret_patterns().iter().any(|re| re.is_match(value))
}

/// Apply the three-stage redaction filter to an audit event's `data` value.
pub fn redact(data: Value) -> Value {
    match data {
        Value::Object(map) => Value::Object(redact_object(map)),
        other => other,
    }
}

fn redact_object(map: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        if EXCLUDED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        if !ALLOWED_FIELDS.contains(&key.as_str()) {
            out.insert(key, Value::String(REDACTED_PLACEHOLDER.to_string()));
            continue;
        }
        out.insert(key, redact_allowed_value(value));
    }
    out
}

fn redact_allowed_value(value: Value) -> Value {
    match value {
        Value::String(s) if looks_like_secret(&s) => Value::String(REDACTED_PLACEHOLDER.to_string()),
        Value::Object(nested) => Value::Object(redact_object(nested)),
        // Arrays of primitives pass through unchanged; only the containing
        // key's exclusion/allowlist status governs them.
        other => other,
    }
}

#[cfg(test)]
#[path = "redaction_tests.rs"]
mod tests;
