// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Migration Engine (C8): three-valued legacy-layout detection, guard-file
//! crash-consistent backup, modal confirmation, and pre-rename revalidation
//! against the TOCTOU window between host windows (§4.8).

use envcore::{AuditEvent, DetectionResult, DetectionState, EventType, GuardRecord};
use envcore_adapters::{
    BackgroundOperationManager, DaemonController, HostStorageProvider, PromptChoice, PromptPort,
};
use envcore_storage::{AuditLog, MetadataStore};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::error::MigrationError;

/// Single-read-atomic legacy-layout detection (§4.8.1). A `NotFound` schema
/// marker, or no hidden directory, or no `env.json`, all mean `NotLegacy`.
/// Any other read error is `UnknownIoError` and must never imply backup.
pub fn detect_migration_state(store: &MetadataStore) -> DetectionResult {
    if !store.hidden_dir().exists() {
        return DetectionResult::not_legacy("no hidden workspace directory", json!({}));
    }
    if !store.env_json_exists() {
        return DetectionResult::not_legacy("hidden directory present but env.json absent", json!({}));
    }

    match store.read_schema_marker_raw() {
        Ok(raw) => match raw.trim().parse::<u32>() {
            Ok(version) if version >= envcore::CURRENT_SCHEMA_VERSION => {
                DetectionResult::not_legacy("schema marker at or above current version", json!({ "schemaVersion": version }))
            }
            Ok(version) => DetectionResult::legacy_confirmed(
                "schema marker older than current version",
                json!({ "schemaVersion": version }),
            ),
            Err(_) => DetectionResult::legacy_confirmed(
                "schema marker unparseable, treated as legacy",
                json!({ "rawValue": raw }),
            ),
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            DetectionResult::legacy_confirmed("schema marker absent", json!({}))
        }
        Err(err) => DetectionResult::unknown_io_error(
            "schema marker unreadable for a non-ENOENT reason",
            json!({ "errorCode": err.kind().to_string() }),
        ),
    }
}

/// Outcome of `check_pre_upgrade_migration()` (§4.8.2, §4.8.5).
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    None,
    IoError { error: String },
    UserDeclined,
    RevalidationAborted,
    BackupSuccess { backup_path: PathBuf },
    BackupFailed { error: String },
}

impl MigrationOutcome {
    pub fn requires_fresh_init(&self) -> bool {
        matches!(self, MigrationOutcome::BackupSuccess { .. })
    }
}

fn audit_event(
    event_type: EventType,
    host: &dyn HostStorageProvider,
    store: &MetadataStore,
    data: Option<serde_json::Value>,
) -> AuditEvent {
    AuditEvent {
        event_type,
        timestamp: chrono::Utc::now(),
        session_id: host.session_id().to_string(),
        workspace_path: store.workspace_root().to_string_lossy().into_owned(),
        extension_version: host.extension_version(),
        data,
    }
}

/// Host collaborators the migration engine needs for quiescence and
/// confirmation, beyond storage.
pub struct MigrationPorts<'a> {
    pub host: &'a dyn HostStorageProvider,
    pub background: &'a dyn BackgroundOperationManager,
    pub daemon: &'a dyn DaemonController,
    pub prompt: &'a dyn PromptPort,
}

/// `checkPreUpgradeMigration()` (§4.8.2): the full detect → confirm →
/// revalidate → backup orchestration.
pub async fn check_pre_upgrade_migration(
    store: &MetadataStore,
    audit: &AuditLog,
    ports: &MigrationPorts<'_>,
    background_pause_timeout: Duration,
    daemon_stop_timeout: Duration,
    windows_settle: Duration,
) -> MigrationOutcome {
    audit.log(audit_event(EventType::MigrationCheckInvoked, ports.host, store, None));

    if audit.guard_path().exists() {
        audit.log(audit_event(EventType::OrphanGuardFileDetected, ports.host, store, None));
    }

    let detection = detect_migration_state(store);
    audit.log(audit_event(
        EventType::MigrationDetectionResult,
        ports.host,
        store,
        Some(json!({ "state": detection.state, "reason": detection.reason, "diagnostics": detection.diagnostics })),
    ));

    match detection.state {
        DetectionState::UnknownIoError => {
            audit.log(audit_event(
                EventType::UnknownIoError,
                ports.host,
                store,
                Some(json!({ "errorCode": detection.reason })),
            ));
            return MigrationOutcome::IoError { error: detection.reason };
        }
        DetectionState::NotLegacy => return MigrationOutcome::None,
        DetectionState::LegacyConfirmed => {}
    }

    audit.log(audit_event(EventType::BackupModalShown, ports.host, store, None));
    let choice = ports
        .prompt
        .warn_modal("This workspace uses a storage layout from an older version. Existing data will be backed up before continuing.")
        .await;

    if choice == PromptChoice::Ignore {
        audit.log(audit_event(EventType::BackupUserDeclined, ports.host, store, None));
        return MigrationOutcome::UserDeclined;
    }
    audit.log(audit_event(EventType::BackupUserConfirmed, ports.host, store, None));

    let revalidation = detect_migration_state(store);
    match revalidation.state {
        DetectionState::NotLegacy => {
            audit.log(audit_event(
                EventType::PreBackupRevalidation,
                ports.host,
                store,
                Some(json!({ "revalidationResult": revalidation.state, "markerNowPresent": true })),
            ));
            return MigrationOutcome::RevalidationAborted;
        }
        DetectionState::UnknownIoError => {
            audit.log(audit_event(
                EventType::PreBackupRevalidation,
                ports.host,
                store,
                Some(json!({ "revalidationResult": revalidation.state })),
            ));
            return MigrationOutcome::IoError { error: revalidation.reason };
        }
        DetectionState::LegacyConfirmed => {
            audit.log(audit_event(
                EventType::PreBackupRevalidation,
                ports.host,
                store,
                Some(json!({ "revalidationResult": revalidation.state, "markerNowPresent": false })),
            ));
        }
    }

    match perform_backup(store, audit, ports, background_pause_timeout, daemon_stop_timeout, windows_settle).await {
        Ok(backup_path) => MigrationOutcome::BackupSuccess { backup_path },
        Err(err) => MigrationOutcome::BackupFailed { error: err.to_string() },
    }
}

fn collision_free_backup_name(store: &MetadataStore, now: chrono::DateTime<chrono::Utc>) -> PathBuf {
    let stamp = now.format("%Y%m%dT%H%M%S");
    let base = format!("pre-{}-backup-{}", envcore::CURRENT_SCHEMA_VERSION, stamp);
    let workspace = store.workspace_root();
    let mut candidate = workspace.join(&base);
    let mut suffix = 1;
    while candidate.exists() {
        candidate = workspace.join(format!("{base}-{suffix}"));
        suffix += 1;
    }
    candidate
}

/// `performBackup()` (§4.8.3): quiesce, then rename the hidden directory to
/// a timestamped sibling under a write-guard-first crash-consistency
/// protocol.
pub async fn perform_backup(
    store: &MetadataStore,
    audit: &AuditLog,
    ports: &MigrationPorts<'_>,
    background_pause_timeout: Duration,
    daemon_stop_timeout: Duration,
    windows_settle: Duration,
) -> Result<PathBuf, MigrationError> {
    let operation_id = Uuid::new_v4();
    audit.log(audit_event(
        EventType::BackupStarted,
        ports.host,
        store,
        Some(json!({ "operationId": operation_id })),
    ));

    audit.log(audit_event(EventType::BackupQuiesceStart, ports.host, store, None));
    let paused = ports.background.pause(background_pause_timeout).await;
    let stop_result = tokio::time::timeout(daemon_stop_timeout, ports.daemon.stop()).await;
    let daemon_stopped = matches!(stop_result, Ok(Ok(())));

    if daemon_stopped && cfg!(windows) {
        tokio::time::sleep(windows_settle).await;
    }

    if !paused || !daemon_stopped {
        audit.log(audit_event(EventType::BackupQuiesceFailed, ports.host, store, None));
        // `pause()` may have begun suppressing new background work even
        // though quiescence wasn't reached in time; always undo it.
        ports.background.resume().await;
        return Err(MigrationError::QuiescenceFailed(
            "background operations or daemon did not release the workspace in time".to_string(),
        ));
    }
    audit.log(audit_event(EventType::BackupQuiesceComplete, ports.host, store, None));

    let backup_path = collision_free_backup_name(store, chrono::Utc::now());

    let guard = GuardRecord::new(
        operation_id,
        chrono::Utc::now(),
        store.workspace_root().to_path_buf(),
        ports.host.extension_version(),
        backup_path.clone(),
    );
    if let Err(err) = write_guard_file(&audit.guard_path(), &guard) {
        tracing::warn!(error = %err, "failed to write guard file; continuing, trace will be lost on crash");
    } else {
        audit.log(audit_event(EventType::BackupGuardFileWritten, ports.host, store, None));
    }
    // Mirrors the host-storage guard record with a cheap workspace-local
    // signal the health classifier (C7) can check without a host-storage
    // dependency.
    if let Err(err) = store.write_migration_marker() {
        tracing::warn!(error = %err, "failed to write workspace-local migration marker");
    }

    let hidden_dir = store.hidden_dir();
    let rename_result = crate::retry::rename_with_retry(&hidden_dir, &backup_path).await;
    // The rename attempt is the last thing that needs the workspace quiesced,
    // win or lose — resume before reporting the outcome.
    ports.background.resume().await;

    match rename_result {
        Ok(()) => {
            if let Err(err) = std::fs::remove_file(audit.guard_path()) {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(error = %err, "failed to delete guard file after successful backup");
                }
            }
            if let Err(err) = store.delete_migration_marker() {
                tracing::warn!(error = %err, "failed to delete workspace-local migration marker");
            }
            audit.log(audit_event(EventType::BackupGuardFileDeleted, ports.host, store, None));
            audit.log(audit_event(
                EventType::BackupCompleted,
                ports.host,
                store,
                Some(json!({ "backupPath": backup_path.to_string_lossy() })),
            ));
            Ok(backup_path)
        }
        Err(err) => {
            // Guard file is intentionally left in place for forensics.
            audit.log(audit_event(
                EventType::BackupFailed,
                ports.host,
                store,
                Some(json!({ "error": err.to_string() })),
            ));
            Err(MigrationError::RenameFailed(err.to_string()))
        }
    }
}

fn write_guard_file(path: &std::path::Path, guard: &GuardRecord) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(guard).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    std::fs::write(path, json)
}

#[cfg(test)]
#[path = "migration_tests.rs"]
mod tests;
