// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metadata Store (C2): read/write `env.json`, `version.json`, and the
//! plain-text schema marker under the hidden workspace directory. Writes
//! create parent directories lazily; reads return `None` on absence or
//! parse failure rather than propagating an error.

use envcore::{EnvMetadata, VersionRecord};
use std::io;
use std::path::{Path, PathBuf};

/// Name of the hidden per-workspace directory that holds everything this
/// core manages.
pub const HIDDEN_DIR_NAME: &str = ".envcore";

/// Sentinel file marking an interrupted migration, consulted by the
/// Workspace Health Classifier (§4.7). Written alongside the host-storage
/// guard record and removed alongside it.
pub const MIGRATION_IN_PROGRESS_MARKER_NAME: &str = "migration-in-progress";

fn hidden_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(HIDDEN_DIR_NAME)
}

fn env_json_path(workspace_root: &Path) -> PathBuf {
    hidden_dir(workspace_root).join("env.json")
}

fn version_json_path(workspace_root: &Path) -> PathBuf {
    hidden_dir(workspace_root).join("version.json")
}

fn schema_marker_path(workspace_root: &Path) -> PathBuf {
    hidden_dir(workspace_root).join("system").join("SCHEMA_VERSION")
}

fn migration_marker_path(workspace_root: &Path) -> PathBuf {
    hidden_dir(workspace_root).join(MIGRATION_IN_PROGRESS_MARKER_NAME)
}

fn venv_dir_path(workspace_root: &Path) -> PathBuf {
    hidden_dir(workspace_root).join("venv")
}

/// Platform-specific expected interpreter path inside the managed venv
/// (tier 2 of the resolver precedence, §4.4).
pub fn managed_interpreter_path(workspace_root: &Path) -> PathBuf {
    let venv = venv_dir_path(workspace_root);
    if cfg!(windows) {
        venv.join("Scripts").join("python.exe")
    } else {
        venv.join("bin").join("python")
    }
}

/// Atomically write `contents` to `path`: write a sibling temp file, fsync,
/// then rename over the destination.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Thin record persistence for one workspace's hidden directory.
pub struct MetadataStore {
    workspace_root: PathBuf,
}

impl MetadataStore {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn hidden_dir(&self) -> PathBuf {
        hidden_dir(&self.workspace_root)
    }

    pub fn venv_dir(&self) -> PathBuf {
        venv_dir_path(&self.workspace_root)
    }

    pub fn managed_interpreter_path(&self) -> PathBuf {
        managed_interpreter_path(&self.workspace_root)
    }

    pub fn env_json_exists(&self) -> bool {
        env_json_path(&self.workspace_root).exists()
    }

    /// Returns `None` if `env.json` is absent or fails to parse. A parse
    /// failure is logged but never propagated — the caller treats it as
    /// "no metadata" per §4.4's corrupted-metadata rule.
    pub fn read_env_metadata(&self) -> Option<EnvMetadata> {
        let path = env_json_path(&self.workspace_root);
        let raw = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "env.json present but unparseable");
                None
            }
        }
    }

    pub fn write_env_metadata(&self, metadata: &EnvMetadata) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(metadata)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        write_atomic(&env_json_path(&self.workspace_root), &json)
    }

    pub fn read_version_record(&self) -> Option<VersionRecord> {
        let path = version_json_path(&self.workspace_root);
        let raw = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "version.json present but unparseable");
                None
            }
        }
    }

    pub fn write_version_record(&self, record: &VersionRecord) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(record)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        write_atomic(&version_json_path(&self.workspace_root), &json)
    }

    /// Single read of the schema marker, no existence check first — the
    /// caller distinguishes `NotFound` from other I/O errors to drive the
    /// three-valued migration detection (§4.8.1).
    pub fn read_schema_marker_raw(&self) -> io::Result<String> {
        std::fs::read_to_string(schema_marker_path(&self.workspace_root))
    }

    /// Write the schema marker. Must be called before `write_env_metadata`
    /// on every path that adopts or creates an environment (§4.8.4) — this
    /// store does not enforce the ordering itself.
    pub fn write_schema_marker(&self, version: u32) -> io::Result<()> {
        write_atomic(
            &schema_marker_path(&self.workspace_root),
            version.to_string().as_bytes(),
        )
    }

    pub fn migration_marker_exists(&self) -> bool {
        migration_marker_path(&self.workspace_root).exists()
    }

    pub fn write_migration_marker(&self) -> io::Result<()> {
        write_atomic(&migration_marker_path(&self.workspace_root), b"")
    }

    pub fn delete_migration_marker(&self) -> io::Result<()> {
        match std::fs::remove_file(migration_marker_path(&self.workspace_root)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[path = "metadata_store_tests.rs"]
mod tests;
