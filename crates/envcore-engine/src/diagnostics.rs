// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostics Reporter (C9): a machine-readable and human-readable report
//! combining the resolver (C4) and a freshly forced preflight run (C5).

use envcore::{Clock, ResolvedInterpreter};
use envcore_adapters::{ConfigPort, HostStorageProvider};
use envcore_storage::{AuditLog, MetadataStore};
use serde::Serialize;
use serde_json::json;

use crate::preflight::PreflightVerifier;
use crate::resolver;

/// Output of `generateReport()` (§4.9): a human-readable `markdown` body and
/// a `data` value carrying the same facts for machine consumption.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub healthy: bool,
    pub markdown: String,
    pub data: serde_json::Value,
}

/// `generateReport()`: always invalidates the preflight cache first so the
/// report reflects the present moment rather than a stale cache entry.
pub async fn generate_report(
    store: &MetadataStore,
    config: &dyn ConfigPort,
    clock: &dyn Clock,
    preflight: &PreflightVerifier,
    audit: &AuditLog,
    host: &dyn HostStorageProvider,
) -> DiagnosticsReport {
    preflight.invalidate_cache();

    let resolved = resolver::resolve(store, config, audit, host);
    let preflight_result = preflight
        .verify(store, config, clock, config.debug_logging(), audit, host)
        .await;
    let healthy = preflight_result.status == envcore::PreflightStatus::Healthy;

    let markdown = render_markdown(&resolved, &preflight_result);

    let data = json!({
        "healthy": healthy,
        "interpreter": {
            "path": resolved.interpreter_path,
            "reason": resolved.reason,
            "ownership": resolved.ownership,
            "metadataExists": resolved.metadata_exists,
        },
        "preflight": preflight_result,
    });

    DiagnosticsReport { healthy, markdown, data }
}

fn render_markdown(
    resolved: &ResolvedInterpreter,
    preflight: &envcore::PreflightResult,
) -> String {
    let mut out = String::new();

    out.push_str("# Workspace Environment Diagnostics\n\n");
    out.push_str("## Summary\n\n");
    if preflight.status == envcore::PreflightStatus::Healthy {
        out.push_str("The workspace environment is healthy.\n\n");
    } else {
        out.push_str("The workspace environment is **not** healthy.\n\n");
    }

    out.push_str("## Interpreter Selection\n\n");
    out.push_str(&format!("- Path: `{}`\n", resolved.interpreter_path));
    out.push_str(&format!("- Reason: `{:?}`\n", resolved.reason));
    out.push_str(&format!(
        "- Ownership: {}\n",
        resolved
            .ownership
            .map(|o| format!("`{o:?}`"))
            .unwrap_or_else(|| "unknown".to_string())
    ));
    out.push_str(&format!("- Fingerprint present: {}\n", preflight.module_version.is_some()));
    out.push_str(&format!("- Metadata present: {}\n\n", resolved.metadata_exists));

    out.push_str("## Preflight\n\n");
    out.push_str(&format!("- Status: `{:?}`\n", preflight.status));
    out.push_str(&format!("- Module importable: {}\n", preflight.module_importable));
    out.push_str(&format!(
        "- Module version: {}\n",
        preflight.module_version.as_deref().unwrap_or("unknown")
    ));
    out.push_str(&format!("- Duration: {}\n", envcore::format_duration_ms(preflight.duration_ms)));
    out.push_str(&format!("- Cached: {}\n\n", preflight.cached));

    if let Some(error) = &preflight.error {
        out.push_str("## Error Details\n\n");
        out.push_str(&format!("```\n{error}\n```\n\n"));
    }

    if let Some(remediation) = &preflight.remediation {
        out.push_str("## Recommended Actions\n\n");
        out.push_str(&format!("- {}\n\n", remediation.message));
    }

    out.push_str("## Machine-Readable Summary\n\n```json\n");
    let machine = json!({
        "status": preflight.status,
        "reasonCode": preflight.reason_code,
        "interpreterPath": resolved.interpreter_path,
        "reason": resolved.reason,
        "ownership": resolved.ownership,
        "cached": preflight.cached,
    });
    out.push_str(&serde_json::to_string_pretty(&machine).unwrap_or_default());
    out.push_str("\n```\n");

    out
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
