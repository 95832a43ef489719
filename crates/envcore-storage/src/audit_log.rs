// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit Log (C3): JSONL append-only log in host-owned storage, outside
//! the workspace so it survives the directory rename the migration engine
//! performs. Size-bounded rotation, retention cap, best-effort writes.

use envcore::AuditEvent;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::redaction::redact;

/// Directory (under host global storage) holding all audit log files.
const AUDIT_SUBDIR: &str = "audit";

/// First 12 hex characters of the SHA-256 digest of the absolute workspace
/// path — the partition key for per-workspace audit files (§4.3).
pub fn workspace_path_prefix(workspace_path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(workspace_path.to_string_lossy().as_bytes());
    hex::encode(hasher.finalize())[..12].to_string()
}

/// Best-effort JSONL audit log for a single workspace.
pub struct AuditLog {
    audit_dir: PathBuf,
    prefix: String,
    rotation_threshold_bytes: u64,
    retention_cap: usize,
}

impl AuditLog {
    pub fn new(global_storage_root: impl Into<PathBuf>, workspace_path: &Path) -> Self {
        Self {
            audit_dir: global_storage_root.into().join(AUDIT_SUBDIR),
            prefix: workspace_path_prefix(workspace_path),
            rotation_threshold_bytes: crate::env::audit_rotation_threshold_bytes(),
            retention_cap: crate::env::audit_retention_cap(),
        }
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn with_policy(
        global_storage_root: impl Into<PathBuf>,
        workspace_path: &Path,
        rotation_threshold_bytes: u64,
        retention_cap: usize,
    ) -> Self {
        Self {
            audit_dir: global_storage_root.into().join(AUDIT_SUBDIR),
            prefix: workspace_path_prefix(workspace_path),
            rotation_threshold_bytes,
            retention_cap,
        }
    }

    pub fn current_log_path(&self) -> PathBuf {
        self.audit_dir.join(format!("audit-{}.jsonl", self.prefix))
    }

    fn guard_file_path(&self) -> PathBuf {
        self.audit_dir.join(format!("guard-{}.json", self.prefix))
    }

    pub fn guard_path(&self) -> PathBuf {
        self.guard_file_path()
    }

    /// Redact `event.data` (if present) and append it, rotating first if
    /// the append would exceed the rotation threshold. Never propagates a
    /// failure — logging is best-effort per §4.3.
    pub fn log(&self, mut event: AuditEvent) {
        if let Some(data) = event.data.take() {
            event.data = Some(redact(data));
        }
        if let Err(err) = self.try_log(&event) {
            tracing::error!(error = %err, "audit log append failed");
        }
    }

    fn try_log(&self, event: &AuditEvent) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.audit_dir)?;

        let mut line = serde_json::to_vec(event)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        line.push(b'\n');

        let path = self.current_log_path();
        let current_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if current_size + line.len() as u64 > self.rotation_threshold_bytes {
            self.rotate(&path)?;
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        file.write_all(&line)?;
        Ok(())
    }

    fn rotate(&self, path: &Path) -> std::io::Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let ts = chrono::Utc::now().format("%Y%m%dT%H%M%S");
        let rotated_name = format!("audit-{}.{}.jsonl", self.prefix, ts);
        let rotated_path = self.audit_dir.join(rotated_name);
        std::fs::rename(path, &rotated_path)?;
        self.enforce_retention()?;
        Ok(())
    }

    fn enforce_retention(&self) -> std::io::Result<()> {
        let rotated_prefix = format!("audit-{}.", self.prefix);
        let mut rotated: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();

        for entry in std::fs::read_dir(&self.audit_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(&rotated_prefix) && name.ends_with(".jsonl") {
                let mtime = entry.metadata()?.modified()?;
                rotated.push((mtime, entry.path()));
            }
        }

        rotated.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, path) in rotated.into_iter().skip(self.retention_cap) {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "audit_log_tests.rs"]
mod tests;
