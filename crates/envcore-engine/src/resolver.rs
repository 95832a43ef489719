// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interpreter Resolver (C4): deterministic 4-tier precedence selection of
//! the runtime path (§4.4). This is the sole path by which any other
//! component obtains the interpreter — duplicating the precedence walk
//! elsewhere is forbidden.

use envcore::{AuditEvent, EventType, ResolvedInterpreter, ResolverReason};
use envcore_adapters::{ConfigPort, HostStorageProvider};
use envcore_storage::{AuditLog, MetadataStore};
use serde_json::json;

fn system_fallback() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

fn resolve_tiers(store: &MetadataStore, config: &dyn ConfigPort, metadata_exists: bool) -> ResolvedInterpreter {
    if let Some(metadata) = store.read_env_metadata() {
        return ResolvedInterpreter {
            interpreter_path: metadata.interpreter_path,
            reason: ResolverReason::Metadata,
            ownership: Some(metadata.ownership),
            metadata_exists,
        };
    }

    let managed_path = store.managed_interpreter_path();
    if managed_path.exists() {
        return ResolvedInterpreter {
            interpreter_path: managed_path.to_string_lossy().into_owned(),
            reason: ResolverReason::ManagedVenvHeuristic,
            ownership: None,
            metadata_exists,
        };
    }

    if let Some(configured) = config.interpreter_path().filter(|p| !p.is_empty()) {
        return ResolvedInterpreter {
            interpreter_path: configured,
            reason: ResolverReason::ExplicitConfig,
            ownership: None,
            metadata_exists,
        };
    }

    ResolvedInterpreter {
        interpreter_path: system_fallback().to_string(),
        reason: ResolverReason::SystemFallback,
        ownership: None,
        metadata_exists,
    }
}

/// Resolve the interpreter for `store`'s workspace, walking the four tiers
/// in precedence order. A corrupted `env.json` is treated as absent for
/// tier 1 (`MetadataStore::read_env_metadata` already returns `None` on
/// parse failure) but `metadata_exists` still reports whether the file is
/// physically present, for diagnostics.
///
/// Every call is logged once, at normal verbosity, with the winning
/// interpreter path, reason, ownership, and whether `env.json` existed
/// (§4.4) — both to `tracing` and to the audit log.
pub fn resolve(
    store: &MetadataStore,
    config: &dyn ConfigPort,
    audit: &AuditLog,
    host: &dyn HostStorageProvider,
) -> ResolvedInterpreter {
    let metadata_exists = store.env_json_exists();
    let resolved = resolve_tiers(store, config, metadata_exists);

    tracing::info!(
        interpreter_path = %resolved.interpreter_path,
        reason = ?resolved.reason,
        ownership = ?resolved.ownership,
        metadata_exists = resolved.metadata_exists,
        "resolved interpreter"
    );

    audit.log(AuditEvent {
        event_type: EventType::ResolverDecision,
        timestamp: chrono::Utc::now(),
        session_id: host.session_id().to_string(),
        workspace_path: store.workspace_root().to_string_lossy().into_owned(),
        extension_version: host.extension_version(),
        data: Some(json!({
            "interpreterPath": resolved.interpreter_path,
            "reason": resolved.reason,
            "ownership": resolved.ownership,
            "metadataExists": resolved.metadata_exists,
        })),
    });

    resolved
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
