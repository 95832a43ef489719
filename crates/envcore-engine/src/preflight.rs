// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Preflight Verifier (C5): a bounded subprocess probe of module
//! importability, a reason-code classifier, and a TTL'd result cache.

use envcore::{
    AuditEvent, Clock, EventType, Ownership, PreflightResult, PreflightStatus, ReasonCode,
    Remediation,
};
use envcore_adapters::{redact_paths, ConfigPort, HostStorageProvider, ProcessError, ProcessRunner, RunOptions};
use envcore_storage::{AuditLog, MetadataStore};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

use crate::resolver;

/// Name of the native module the probe attempts to import. Not specified
/// literally by the system this core belongs to; fixed here as the single
/// name every call site shares.
pub const REQUIRED_MODULE_NAME: &str = "kg_bridge";

fn probe_source(module_name: &str) -> String {
    format!(
        "import json\ntry:\n    import {module} as _m\n    print(json.dumps({{\"status\": \"ok\", \"module_importable\": True, \"module_version\": getattr(_m, \"__version__\", None)}}))\nexcept Exception as e:\n    print(json.dumps({{\"status\": \"error\", \"module_importable\": False, \"error\": str(e)}}))\n",
        module = module_name
    )
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[allow(dead_code)]
    status: String,
    module_importable: bool,
    #[serde(default)]
    module_version: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Classify combined `error + stderr` text (already lowercased by the
/// caller) into the low-cardinality reason-code enumeration (§4.5). Never
/// branches on parsed English beyond this mapping.
pub fn classify_reason(combined_lowercase: &str, target_module: &str) -> ReasonCode {
    let target_lower = target_module.to_lowercase();
    if combined_lowercase.contains("timed out") {
        ReasonCode::PythonTimeout
    } else if combined_lowercase.contains("not found")
        && (combined_lowercase.contains("python") || combined_lowercase.contains("interpreter"))
    {
        ReasonCode::PythonNotFound
    } else if combined_lowercase.contains("permission denied") {
        ReasonCode::PermissionDenied
    } else if combined_lowercase.contains("database is locked")
        || combined_lowercase.contains("resource busy")
    {
        ReasonCode::DbLockedOrBusy
    } else if combined_lowercase.contains("dll load failed")
        || combined_lowercase.contains("image not found")
    {
        ReasonCode::DllLoadFailed
    } else if combined_lowercase.contains(&format!("no module named '{target_lower}'"))
        || combined_lowercase.contains(&format!("no module named \"{target_lower}\""))
    {
        ReasonCode::ModuleImportFailed
    } else if combined_lowercase.contains("no module named") {
        ReasonCode::ModuleDepNotFound
    } else if combined_lowercase.contains("exec")
        || combined_lowercase.contains("spawn")
    {
        ReasonCode::PythonExecFailed
    } else {
        ReasonCode::Unknown
    }
}

struct CacheEntry {
    result: PreflightResult,
    interpreter_path: String,
    ownership: Option<Ownership>,
    dependency_fingerprint: Option<String>,
    cached_at: Instant,
}

/// Bounded subprocess probe with a TTL'd single-entry cache (§4.5).
pub struct PreflightVerifier {
    runner: ProcessRunner,
    timeout: Duration,
    ttl: Duration,
    cache: Mutex<Option<CacheEntry>>,
}

impl PreflightVerifier {
    pub fn new(timeout: Duration, ttl: Duration) -> Self {
        Self {
            runner: ProcessRunner::new(),
            timeout,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// Drop any cached result. Mandatory after every dependency-mutating
    /// operation and after adopting a new interpreter.
    pub fn invalidate_cache(&self) {
        *self.cache.lock() = None;
    }

    pub async fn verify(
        &self,
        store: &MetadataStore,
        config: &dyn ConfigPort,
        clock: &dyn Clock,
        debug_logging: bool,
        audit: &AuditLog,
        host: &dyn HostStorageProvider,
    ) -> PreflightResult {
        let start = Instant::now();
        let resolved = resolver::resolve(store, config, audit, host);
        let dependency_fingerprint = store
            .read_env_metadata()
            .map(|m| m.dependency_set_fingerprint);

        if let Some(cached) = self.cached_result(&resolved.interpreter_path, resolved.ownership, &dependency_fingerprint, clock) {
            self.log_verification(store, host, audit, &cached, "cache");
            return cached;
        }

        let result = self
            .run_probe(&resolved.interpreter_path, resolved.ownership, debug_logging)
            .await;
        let result = PreflightResult {
            duration_ms: start.elapsed().as_millis() as u64,
            cached: false,
            ..result
        };

        if result.status == PreflightStatus::Healthy {
            *self.cache.lock() = Some(CacheEntry {
                result: result.clone(),
                interpreter_path: resolved.interpreter_path,
                ownership: resolved.ownership,
                dependency_fingerprint,
                cached_at: clock.monotonic(),
            });
        }

        self.log_verification(store, host, audit, &result, "probe");
        result
    }

    /// Emits the `tracing` event and `PreflightVerified` audit entry
    /// required for both the cache-hit and fresh-run paths (§4.5).
    fn log_verification(
        &self,
        store: &MetadataStore,
        host: &dyn HostStorageProvider,
        audit: &AuditLog,
        result: &PreflightResult,
        source: &str,
    ) {
        tracing::info!(
            status = ?result.status,
            module_importable = result.module_importable,
            module_version = ?result.module_version,
            ownership = ?result.ownership,
            reason_code = ?result.reason_code,
            duration_ms = result.duration_ms,
            cached = result.cached,
            source,
            "preflight verified"
        );

        audit.log(AuditEvent {
            event_type: EventType::PreflightVerified,
            timestamp: chrono::Utc::now(),
            session_id: host.session_id().to_string(),
            workspace_path: store.workspace_root().to_string_lossy().into_owned(),
            extension_version: host.extension_version(),
            data: Some(json!({
                "status": result.status,
                "moduleImportable": result.module_importable,
                "moduleVersion": result.module_version,
                "ownership": result.ownership,
                "reasonCode": result.reason_code,
                "durationMs": result.duration_ms,
                "cached": result.cached,
                "source": source,
                "extensionHostPid": host.process_id(),
            })),
        });
    }

    fn cached_result(
        &self,
        interpreter_path: &str,
        ownership: Option<Ownership>,
        dependency_fingerprint: &Option<String>,
        clock: &dyn Clock,
    ) -> Option<PreflightResult> {
        let guard = self.cache.lock();
        let entry = guard.as_ref()?;
        if entry.interpreter_path != interpreter_path {
            return None;
        }
        if entry.ownership != ownership {
            return None;
        }
        if &entry.dependency_fingerprint != dependency_fingerprint {
            return None;
        }
        if clock.monotonic().saturating_duration_since(entry.cached_at) >= self.ttl {
            return None;
        }
        let mut result = entry.result.clone();
        result.cached = true;
        Some(result)
    }

    async fn run_probe(
        &self,
        interpreter_path: &str,
        ownership: Option<Ownership>,
        debug_logging: bool,
    ) -> PreflightResult {
        let args = vec!["-c".to_string(), probe_source(REQUIRED_MODULE_NAME)];
        let cwd = std::env::temp_dir();

        match self
            .runner
            .run(interpreter_path, &args, &cwd, RunOptions::new(self.timeout))
            .await
        {
            Ok(stdout) => self.classify_stdout(&stdout, interpreter_path, ownership, debug_logging),
            Err(ProcessError::NotFound { .. }) | Err(ProcessError::SpawnFailed { .. }) => {
                PreflightResult {
                    status: PreflightStatus::InterpreterNotRunnable,
                    module_importable: false,
                    module_version: None,
                    interpreter_path: interpreter_path.to_string(),
                    ownership,
                    reason_code: Some(ReasonCode::PythonNotFound),
                    remediation: Some(Remediation::for_ownership(ownership)),
                    duration_ms: 0,
                    cached: false,
                    error: Some("interpreter not found".to_string()),
                }
            }
            Err(ProcessError::Timeout { .. }) => PreflightResult {
                status: PreflightStatus::InterpreterNotRunnable,
                module_importable: false,
                module_version: None,
                interpreter_path: interpreter_path.to_string(),
                ownership,
                reason_code: Some(ReasonCode::PythonTimeout),
                remediation: Some(Remediation::for_ownership(ownership)),
                duration_ms: 0,
                cached: false,
                error: Some("preflight probe timed out".to_string()),
            },
            Err(ProcessError::ExitCode { stderr_tail, .. }) => {
                let combined = stderr_tail.to_lowercase();
                let reason = classify_reason(&combined, REQUIRED_MODULE_NAME);
                let excerpt = if debug_logging {
                    Some(redact_paths(&stderr_tail))
                } else {
                    None
                };
                PreflightResult {
                    status: PreflightStatus::ModuleMissing,
                    module_importable: false,
                    module_version: None,
                    interpreter_path: interpreter_path.to_string(),
                    ownership,
                    reason_code: Some(reason),
                    remediation: Some(Remediation::for_ownership(ownership)),
                    duration_ms: 0,
                    cached: false,
                    error: excerpt,
                }
            }
        }
    }

    fn classify_stdout(
        &self,
        stdout: &str,
        interpreter_path: &str,
        ownership: Option<Ownership>,
        debug_logging: bool,
    ) -> PreflightResult {
        let parsed: Result<ProbeOutput, _> = stdout
            .lines()
            .last()
            .map(serde_json::from_str)
            .unwrap_or_else(|| serde_json::from_str(""));

        match parsed {
            Ok(probe) if probe.module_importable => PreflightResult {
                status: PreflightStatus::Healthy,
                module_importable: true,
                module_version: probe.module_version,
                interpreter_path: interpreter_path.to_string(),
                ownership,
                reason_code: None,
                remediation: None,
                duration_ms: 0,
                cached: false,
                error: None,
            },
            Ok(probe) => {
                let error_text = probe.error.unwrap_or_default();
                let reason = classify_reason(&error_text.to_lowercase(), REQUIRED_MODULE_NAME);
                let excerpt = if debug_logging {
                    Some(redact_paths(&error_text))
                } else {
                    None
                };
                PreflightResult {
                    status: PreflightStatus::ModuleMissing,
                    module_importable: false,
                    module_version: None,
                    interpreter_path: interpreter_path.to_string(),
                    ownership,
                    reason_code: Some(reason),
                    remediation: Some(Remediation::for_ownership(ownership)),
                    duration_ms: 0,
                    cached: false,
                    error: excerpt,
                }
            }
            Err(_) => PreflightResult {
                status: PreflightStatus::ModuleMissing,
                module_importable: false,
                module_version: None,
                interpreter_path: interpreter_path.to_string(),
                ownership,
                reason_code: Some(ReasonCode::Unknown),
                remediation: Some(Remediation::for_ownership(ownership)),
                duration_ms: 0,
                cached: false,
                error: Some("probe produced unparseable output".to_string()),
            },
        }
    }
}

#[cfg(test)]
#[path = "preflight_tests.rs"]
mod tests;
